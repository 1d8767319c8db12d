//! Order endpoints.

use tracing::instrument;

use lotmarket_core::OrderId;

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::models::{NewOrder, Order, OrderQuery, Paginated};

/// Client for the `/orders` endpoints.
#[derive(Clone)]
pub struct OrdersApi {
    client: ApiClient,
}

impl OrdersApi {
    /// Create a new orders service over the shared pipeline.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List the current user's orders.
    ///
    /// # Errors
    ///
    /// Returns the server's failure unchanged.
    #[instrument(skip(self, query))]
    pub async fn list(&self, query: &OrderQuery) -> Result<Paginated<Order>, ApiError> {
        self.client.get_query("/orders/", query).await
    }

    /// Get a single order by ID.
    ///
    /// # Errors
    ///
    /// Returns the server's failure unchanged.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get(&self, id: OrderId) -> Result<Order, ApiError> {
        self.client.get(&format!("/orders/{id}")).await
    }

    /// Create an order for a lot.
    ///
    /// # Errors
    ///
    /// Returns the server's failure unchanged.
    #[instrument(skip(self, order))]
    pub async fn create(&self, order: &NewOrder) -> Result<Order, ApiError> {
        self.client.post("/orders/", order).await
    }

    /// Confirm receipt of a completed order (buyer).
    ///
    /// # Errors
    ///
    /// Returns the server's failure unchanged.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn confirm(&self, id: OrderId) -> Result<(), ApiError> {
        self.client.post_empty(&format!("/orders/{id}/confirm")).await
    }

    /// Cancel a pending order.
    ///
    /// # Errors
    ///
    /// Returns the server's failure unchanged.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn cancel(&self, id: OrderId) -> Result<(), ApiError> {
        self.client.post_empty(&format!("/orders/{id}/cancel")).await
    }
}
