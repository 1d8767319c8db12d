//! Role and status enums for marketplace entities.

use serde::{Deserialize, Serialize};

/// Role of a marketplace user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    User,
    Seller,
    Moderator,
    Admin,
}

/// Listing status of a lot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LotStatus {
    #[default]
    Active,
    Sold,
    Inactive,
    Moderation,
}

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    InProgress,
    Completed,
    Cancelled,
    Disputed,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::User => "user",
            Self::Seller => "seller",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
        };
        write!(f, "{s}")
    }
}

impl std::fmt::Display for LotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Active => "active",
            Self::Sold => "sold",
            Self::Inactive => "inactive",
            Self::Moderation => "moderation",
        };
        write!(f, "{s}")
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Disputed => "disputed",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_serde() {
        assert_eq!(
            serde_json::to_string(&UserRole::Moderator).unwrap(),
            "\"moderator\""
        );
        let parsed: UserRole = serde_json::from_str("\"seller\"").unwrap();
        assert_eq!(parsed, UserRole::Seller);
    }

    #[test]
    fn test_lot_status_serde() {
        assert_eq!(
            serde_json::to_string(&LotStatus::Moderation).unwrap(),
            "\"moderation\""
        );
        let parsed: LotStatus = serde_json::from_str("\"sold\"").unwrap();
        assert_eq!(parsed, LotStatus::Sold);
    }

    #[test]
    fn test_order_status_snake_case() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        let parsed: OrderStatus = serde_json::from_str("\"disputed\"").unwrap();
        assert_eq!(parsed, OrderStatus::Disputed);
    }

    #[test]
    fn test_display_matches_wire_format() {
        assert_eq!(OrderStatus::InProgress.to_string(), "in_progress");
        assert_eq!(UserRole::Admin.to_string(), "admin");
        assert_eq!(LotStatus::Active.to_string(), "active");
    }
}
