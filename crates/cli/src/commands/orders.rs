//! Order commands.

use lotmarket_client::api::OrdersApi;
use lotmarket_client::models::OrderQuery;

use super::{CliError, Context};

/// List the current user's orders.
///
/// # Errors
///
/// Returns an error if configuration fails or the API call fails (including
/// an expired session).
pub async fn list() -> Result<(), CliError> {
    let ctx = Context::from_env()?;
    let page = OrdersApi::new(ctx.client)
        .list(&OrderQuery::default())
        .await?;

    tracing::info!("{} order(s), {} total", page.items.len(), page.total);
    for order in page.items {
        tracing::info!(
            id = %order.id,
            number = %order.order_number,
            price = %order.price,
            status = %order.status,
            "order"
        );
    }
    Ok(())
}
