//! Order models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use lotmarket_core::{LotId, OrderId, OrderStatus, UserId};

use super::Lot;

/// A purchase of a lot, from checkout to completion.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Human-readable order reference.
    pub order_number: String,
    pub buyer_id: UserId,
    pub seller_id: UserId,
    pub lot_id: LotId,
    /// Price at the time of purchase.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub status: OrderStatus,
    #[serde(default)]
    pub buyer_message: Option<String>,
    #[serde(default)]
    pub seller_response: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// The purchased lot, when the server expands it.
    #[serde(default)]
    pub lot: Option<Lot>,
}

/// A paginated listing as returned by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub skip: i64,
    pub limit: i64,
}

/// Query parameters for listing the current user's orders.
#[derive(Debug, Default, Serialize)]
pub struct OrderQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
}

/// Payload for creating an order.
#[derive(Debug, Serialize)]
pub struct NewOrder {
    pub lot_id: LotId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_message: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_paginated_orders_deserialize() {
        let json = r#"{
            "items": [{
                "id": 9,
                "order_number": "LM-2025-0009",
                "buyer_id": 1,
                "seller_id": 2,
                "lot_id": 5,
                "price": 19.99,
                "status": "in_progress",
                "created_at": "2025-03-02T08:30:00Z"
            }],
            "total": 1,
            "skip": 0,
            "limit": 20
        }"#;

        let page: Paginated<Order> = serde_json::from_str(json).unwrap();
        assert_eq!(page.total, 1);
        let order = page.items.first().unwrap();
        assert_eq!(order.id, OrderId::new(9));
        assert_eq!(order.status, OrderStatus::InProgress);
        assert!(order.lot.is_none());
    }
}
