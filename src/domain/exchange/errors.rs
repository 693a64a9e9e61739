use rust_decimal::Decimal;
use uuid::Uuid;

use super::value_objects::ExchangeStatus;

// ============================================================================
// Exchange Business Rule Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    #[error("Cannot {action} exchange: status must be {required} but is {actual}")]
    InvalidTransition {
        action: &'static str,
        required: ExchangeStatus,
        actual: ExchangeStatus,
    },

    #[error("Exchange quantity must be greater than zero: {0}")]
    InvalidQuantity(i32),

    #[error("Exchange quantity {requested} exceeds purchased quantity {purchased}")]
    QuantityExceedsItem { requested: i32, purchased: i32 },

    #[error("Exchange reason cannot be empty")]
    BlankReason,

    #[error("An open exchange already exists for order item {0}")]
    AlreadyOpen(Uuid),

    #[error("A supplier is required to return items to stock")]
    MissingSupplier,

    #[error("A positive cost value is required to return items to stock, got {0:?}")]
    InvalidCostValue(Option<Decimal>),
}
