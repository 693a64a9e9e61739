use rust_decimal::Decimal;
use uuid::Uuid;

use super::value_objects::OrderStatus;

// ============================================================================
// Order Business Rule Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Cannot {action} order: status must be {required} but is {actual}")]
    InvalidTransition {
        action: &'static str,
        required: &'static str,
        actual: OrderStatus,
    },

    #[error("Order items cannot be empty")]
    EmptyItems,
}

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Product '{0}' is not available for sale")]
    ProductInactive(String),

    #[error("Delivery address {0} does not belong to the customer")]
    AddressNotOwned(Uuid),
}

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("At least one payment method is required")]
    NoPayments,

    #[error("Each payment must reference a credit card, a coupon, or both")]
    EmptyInstruction,

    #[error("Card payment amount must be greater than zero: {0}")]
    InvalidAmount(Decimal),

    #[error("Coupon '{0}' was provided more than once")]
    DuplicateCoupon(String),

    #[error("Only one promotional coupon is allowed per order")]
    MultiplePromotional,

    #[error("Each card must be charged at least {minimum}, got {amount}")]
    BelowMinimum { amount: Decimal, minimum: Decimal },

    #[error("Payment does not cover order total: paid {paid}, total {total}")]
    InsufficientPayment { paid: Decimal, total: Decimal },
}
