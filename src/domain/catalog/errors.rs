use rust_decimal::Decimal;

// ============================================================================
// Catalog Business Rule Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Product is already active")]
    AlreadyActive,

    #[error("Product is already inactive")]
    AlreadyInactive,

    #[error("A reason is required to {0} a product")]
    BlankReason(&'static str),

    #[error("Product name cannot be empty")]
    EmptyName,

    #[error("Pricing group name cannot be empty")]
    EmptyPricingGroupName,

    #[error("Invalid product weight: {0}")]
    InvalidWeight(Decimal),

    #[error("Margin percentage cannot be negative: {0}")]
    NegativeMargin(Decimal),
}
