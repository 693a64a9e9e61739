use rust_decimal::Decimal;

// ============================================================================
// Coupon Business Rule Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CouponError {
    #[error("Coupon code cannot be empty")]
    BlankCode,

    #[error("Coupon value must be greater than zero: {0}")]
    InvalidValue(Decimal),

    #[error("Coupon code already exists: {0}")]
    DuplicateCode(String),

    #[error("Coupon '{0}' has already been used")]
    AlreadyUsed(String),

    #[error("Coupon '{0}' has expired")]
    Expired(String),

    #[error("Coupon '{0}' does not belong to this customer")]
    NotOwner(String),
}
