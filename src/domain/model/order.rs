use super::ProductSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Fulfilment status of an order.
///
/// The serialized literals are part of the wire format and keep their historical
/// spellings (`deliverd`, `cancel`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum OrderStatus {
    #[default]
    #[serde(rename = "Not Process")]
    NotProcess,
    #[serde(rename = "Processing")]
    Processing,
    #[serde(rename = "Shipped")]
    Shipped,
    #[serde(rename = "deliverd")]
    Delivered,
    #[serde(rename = "cancel")]
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::NotProcess,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::NotProcess => "Not Process",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "deliverd",
            OrderStatus::Cancelled => "cancel",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a status string is not one of the five literals.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not a valid enum value for path `status`")]
pub struct InvalidStatus(pub String);

impl FromStr for OrderStatus {
    type Err = InvalidStatus;

    /// Exact match only; no trimming or case folding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| InvalidStatus(s.to_string()))
    }
}

/// An order as persisted: references only.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub products: Vec<Uuid>,
    #[schema(value_type = Object)]
    pub payment: JsonValue,
    pub buyer: Uuid,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Validates `raw` against the status enum and applies it.
    pub fn apply_status(&mut self, raw: &str) -> Result<(), InvalidStatus> {
        self.status = raw.parse()?;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// What the checkout flow hands over when an order is placed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewOrder {
    pub products: Vec<Uuid>,
    pub payment: JsonValue,
    pub buyer: Uuid,
}

/// Buyer reference resolved to a display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BuyerRef {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
}

/// An order with its products and buyer populated.
///
/// Entries in `products` are `None` for products deleted after the order was placed;
/// `buyer` is `None` when the user record is gone.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub products: Vec<Option<ProductSummary>>,
    #[schema(value_type = Object)]
    pub payment: JsonValue,
    pub buyer: Option<BuyerRef>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_literal_exactly() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
    }

    #[test]
    fn rejects_anything_outside_the_enum() {
        for raw in ["", " ", "delivered", "Delivered", "not process", "Cancelled", "Shipped "] {
            assert!(raw.parse::<OrderStatus>().is_err(), "accepted {:?}", raw);
        }
    }

    #[test]
    fn serializes_with_literal_spellings() {
        let json = serde_json::to_value(OrderStatus::Delivered).unwrap();
        assert_eq!(json, serde_json::json!("deliverd"));
        assert_eq!(OrderStatus::default().to_string(), "Not Process");
    }

    #[test]
    fn apply_status_allows_any_transition_but_keeps_value_on_error() {
        let mut order = Order {
            id: Uuid::new_v4(),
            products: vec![],
            payment: serde_json::json!({}),
            buyer: Uuid::new_v4(),
            status: OrderStatus::Cancelled,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        order.apply_status("Not Process").unwrap();
        assert_eq!(order.status, OrderStatus::NotProcess);
        assert!(order.apply_status("").is_err());
        assert_eq!(order.status, OrderStatus::NotProcess);
    }
}
