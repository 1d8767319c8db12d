//! Lot listing endpoints.

use tracing::instrument;

use lotmarket_core::LotId;

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::models::{Lot, LotFilters, LotUpdate, NewLot};

/// Client for the `/lots` endpoints.
#[derive(Clone)]
pub struct LotsApi {
    client: ApiClient,
}

impl LotsApi {
    /// Create a new lots service over the shared pipeline.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List lots matching the given filters.
    ///
    /// # Errors
    ///
    /// Returns the server's failure unchanged.
    #[instrument(skip(self, filters))]
    pub async fn list(&self, filters: &LotFilters) -> Result<Vec<Lot>, ApiError> {
        self.client.get_query("/lots/", filters).await
    }

    /// Get a single lot by ID.
    ///
    /// # Errors
    ///
    /// Returns the server's failure unchanged.
    #[instrument(skip(self), fields(lot_id = %id))]
    pub async fn get(&self, id: LotId) -> Result<Lot, ApiError> {
        self.client.get(&format!("/lots/{id}")).await
    }

    /// Create a lot (sellers only).
    ///
    /// # Errors
    ///
    /// Returns the server's failure unchanged.
    #[instrument(skip(self, lot))]
    pub async fn create(&self, lot: &NewLot) -> Result<Lot, ApiError> {
        self.client.post("/lots/", lot).await
    }

    /// Update a lot's listing fields.
    ///
    /// # Errors
    ///
    /// Returns the server's failure unchanged.
    #[instrument(skip(self, update), fields(lot_id = %id))]
    pub async fn update(&self, id: LotId, update: &LotUpdate) -> Result<Lot, ApiError> {
        self.client.put(&format!("/lots/{id}"), update).await
    }

    /// Delete a lot.
    ///
    /// # Errors
    ///
    /// Returns the server's failure unchanged.
    #[instrument(skip(self), fields(lot_id = %id))]
    pub async fn delete(&self, id: LotId) -> Result<(), ApiError> {
        self.client.delete(&format!("/lots/{id}")).await
    }
}
