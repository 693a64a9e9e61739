use rust_decimal::Decimal;
use uuid::Uuid;

use super::value_objects::{Dimensions, StatusChangeCategory};

// ============================================================================
// Catalog Commands
// ============================================================================

#[derive(Debug, Clone)]
pub struct RegisterPricingGroup {
    pub name: String,
    pub margin_percentage: Decimal,
}

#[derive(Debug, Clone)]
pub struct RegisterProduct {
    pub name: String,
    pub dimensions: Dimensions,
    pub weight: Decimal,
    pub pricing_group_id: Uuid,
}

/// Activate or deactivate a product, with the reason logged on it
#[derive(Debug, Clone)]
pub struct ChangeProductStatus {
    pub product_id: Uuid,
    pub reason: String,
    pub category: StatusChangeCategory,
}
