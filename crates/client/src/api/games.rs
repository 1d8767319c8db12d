//! Game catalog endpoints.

use tracing::instrument;

use lotmarket_core::GameId;

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::models::{Category, Game, GameQuery, NewGame};

/// Client for the `/games` endpoints.
#[derive(Clone)]
pub struct GamesApi {
    client: ApiClient,
}

impl GamesApi {
    /// Create a new games service over the shared pipeline.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List games, optionally filtered and paginated.
    ///
    /// # Errors
    ///
    /// Returns the server's failure unchanged.
    #[instrument(skip(self, query))]
    pub async fn list(&self, query: &GameQuery) -> Result<Vec<Game>, ApiError> {
        self.client.get_query("/games/", query).await
    }

    /// Get a single game by ID.
    ///
    /// # Errors
    ///
    /// Returns the server's failure unchanged.
    #[instrument(skip(self), fields(game_id = %id))]
    pub async fn get(&self, id: GameId) -> Result<Game, ApiError> {
        self.client.get(&format!("/games/{id}")).await
    }

    /// List all lot categories.
    ///
    /// # Errors
    ///
    /// Returns the server's failure unchanged.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.client.get("/games/categories/").await
    }

    /// Create a game (moderators and admins).
    ///
    /// # Errors
    ///
    /// Returns the server's failure unchanged.
    #[instrument(skip(self, game))]
    pub async fn create(&self, game: &NewGame) -> Result<Game, ApiError> {
        self.client.post("/games/", game).await
    }
}
