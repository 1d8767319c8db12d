//! User identity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lotmarket_core::{Email, UserId, UserRole};

/// The authenticated user's profile as known to the client.
///
/// Replaced wholesale on every successful profile reload - there is no
/// partial merge of identity fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name, unique per user.
    pub username: String,
    /// User's email address.
    pub email: Email,
    /// Optional public display name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Avatar image URL.
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Free-form profile text.
    #[serde(default)]
    pub bio: Option<String>,
    /// Whether the account is enabled.
    pub is_active: bool,
    /// Whether the account passed verification.
    pub is_verified: bool,
    /// Marketplace role.
    pub role: UserRole,
    /// Average review rating.
    pub rating: f64,
    /// Number of reviews received.
    pub total_reviews: i32,
    /// Completed sales count.
    pub total_sales: i32,
    /// Completed purchases count.
    pub total_purchases: i32,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Last time the user was seen online.
    #[serde(default)]
    pub last_online: Option<DateTime<Utc>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_server_payload() {
        let json = r#"{
            "id": 1,
            "username": "alice",
            "email": "a@b.com",
            "display_name": "Alice",
            "is_active": true,
            "is_verified": false,
            "role": "seller",
            "rating": 4.8,
            "total_reviews": 12,
            "total_sales": 30,
            "total_purchases": 2,
            "created_at": "2025-01-15T10:00:00Z"
        }"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, UserId::new(1));
        assert_eq!(user.username, "alice");
        assert_eq!(user.role, UserRole::Seller);
        assert!(user.updated_at.is_none());
        assert!(user.avatar_url.is_none());
    }
}
