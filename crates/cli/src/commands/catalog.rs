//! Catalog commands: games and lots.

use rust_decimal::Decimal;

use lotmarket_client::api::{GamesApi, LotsApi};
use lotmarket_client::models::{GameQuery, LotFilters, NewLot};
use lotmarket_core::{CategoryId, GameId, LotId};

use super::{CliError, Context};

/// List games, optionally filtered by a search string.
///
/// # Errors
///
/// Returns an error if configuration fails or the API call fails.
pub async fn games_list(search: Option<String>) -> Result<(), CliError> {
    let ctx = Context::from_env()?;
    let games = GamesApi::new(ctx.client)
        .list(&GameQuery {
            search,
            ..GameQuery::default()
        })
        .await?;

    tracing::info!("{} game(s)", games.len());
    for game in games {
        tracing::info!(
            id = %game.id,
            name = %game.name,
            lots = game.total_lots,
            popular = game.is_popular,
            "game"
        );
    }
    Ok(())
}

/// Show one game.
///
/// # Errors
///
/// Returns an error if configuration fails or the game does not exist.
pub async fn games_show(id: GameId) -> Result<(), CliError> {
    let ctx = Context::from_env()?;
    let game = GamesApi::new(ctx.client).get(id).await?;

    tracing::info!(
        id = %game.id,
        name = %game.name,
        slug = %game.slug,
        developer = game.developer.as_deref().unwrap_or("-"),
        lots = game.total_lots,
        "Game"
    );
    Ok(())
}

/// List lots with optional filters.
///
/// # Errors
///
/// Returns an error if configuration fails or the API call fails.
pub async fn lots_list(
    game_id: Option<GameId>,
    search: Option<String>,
    limit: Option<i64>,
) -> Result<(), CliError> {
    let ctx = Context::from_env()?;
    let lots = LotsApi::new(ctx.client)
        .list(&LotFilters {
            game_id,
            search,
            limit,
            ..LotFilters::default()
        })
        .await?;

    tracing::info!("{} lot(s)", lots.len());
    for lot in lots {
        tracing::info!(
            id = %lot.id,
            title = %lot.title,
            price = %lot.price,
            status = %lot.status,
            "lot"
        );
    }
    Ok(())
}

/// Show one lot.
///
/// # Errors
///
/// Returns an error if configuration fails or the lot does not exist.
pub async fn lots_show(id: LotId) -> Result<(), CliError> {
    let ctx = Context::from_env()?;
    let lot = LotsApi::new(ctx.client).get(id).await?;

    tracing::info!(
        id = %lot.id,
        title = %lot.title,
        price = %lot.price,
        status = %lot.status,
        seller = %lot.seller_id,
        views = lot.views,
        "Lot"
    );
    Ok(())
}

/// Create a lot. Requires an authenticated seller session.
///
/// # Errors
///
/// Returns an error if configuration fails or the server rejects the lot.
pub async fn lots_create(
    title: String,
    description: String,
    price: Decimal,
    game_id: GameId,
    category_id: CategoryId,
) -> Result<(), CliError> {
    let ctx = Context::from_env()?;
    let lot = LotsApi::new(ctx.client)
        .create(&NewLot {
            title,
            description,
            price,
            game_id,
            category_id,
            delivery_time: None,
            requirements: None,
            is_auto_delivery: false,
        })
        .await?;

    tracing::info!(id = %lot.id, title = %lot.title, "Lot created");
    Ok(())
}
