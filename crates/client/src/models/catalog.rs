//! Game catalog and lot listing models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use lotmarket_core::{CategoryId, GameId, LotId, LotStatus, UserId};

use super::User;

/// A game in the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub developer: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub genres: Option<Vec<String>>,
    #[serde(default)]
    pub platforms: Option<Vec<String>>,
    /// Number of active lots listed under this game.
    pub total_lots: i32,
    pub is_popular: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A lot category within a game.
#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    pub game_id: GameId,
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
    pub total_lots: i32,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

/// Query parameters for listing games.
#[derive(Debug, Default, Serialize)]
pub struct GameQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Payload for creating a game (moderators and admins).
#[derive(Debug, Serialize)]
pub struct NewGame {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// A lot: one seller's listing of an in-game item, account, or service.
#[derive(Debug, Clone, Deserialize)]
pub struct Lot {
    pub id: LotId,
    pub title: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub seller_id: UserId,
    pub game_id: GameId,
    pub category_id: CategoryId,
    /// Free-form item attributes (server, level, region, ...).
    #[serde(default)]
    pub item_details: Option<serde_json::Value>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    pub status: LotStatus,
    pub is_auto_delivery: bool,
    #[serde(default)]
    pub delivery_time: Option<String>,
    #[serde(default)]
    pub requirements: Option<String>,
    pub views: i32,
    pub favorites: i32,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Seller profile, when the server expands it.
    #[serde(default)]
    pub seller: Option<User>,
}

/// Query parameters for listing lots.
#[derive(Debug, Default, Serialize)]
pub struct LotFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_id: Option<GameId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LotStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

/// Payload for creating a lot.
#[derive(Debug, Serialize)]
pub struct NewLot {
    pub title: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub game_id: GameId,
    pub category_id: CategoryId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    pub is_auto_delivery: bool,
}

/// Partial update of a lot. Unset fields are left unchanged server-side.
#[derive(Debug, Default, Serialize)]
pub struct LotUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LotStatus>,
}
