use rust_decimal::Decimal;
use uuid::Uuid;

// ============================================================================
// Stock Business Rule Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StockError {
    #[error("Quantity must be greater than zero: {0}")]
    InvalidQuantity(i32),

    #[error("Cost value must be greater than zero: {0}")]
    InvalidCostValue(Decimal),

    #[error("Insufficient stock for product '{product}'. Available: {available}, Requested: {requested}")]
    Insufficient {
        product: String,
        available: i32,
        requested: i32,
    },

    #[error("Stock quantity out of range for product {0}")]
    QuantityOverflow(Uuid),

    #[error("Supplier name cannot be empty")]
    EmptySupplierName,
}
