use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::impl_record;

// ============================================================================
// Catalog Value Objects
// ============================================================================

/// Named markup applied over cost to derive the sale price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingGroup {
    pub id: Uuid,
    pub name: String,
    pub margin_percentage: Decimal,
}

impl_record!(PricingGroup, "PricingGroup");

/// Package dimensions, in centimetres
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub height: Decimal,
    pub width: Decimal,
    pub depth: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusDirection {
    Activate,
    Deactivate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusChangeCategory {
    OutOfMarket,
    OutOfStock,
    Discontinued,
    Restocked,
    Manual,
}

/// One entry of a product's append-only activation log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChange {
    pub reason: String,
    pub category: StatusChangeCategory,
    pub direction: StatusDirection,
    pub changed_at: DateTime<Utc>,
}

impl StatusChange {
    pub fn is_activation(&self) -> bool {
        self.direction == StatusDirection::Activate
    }
}
