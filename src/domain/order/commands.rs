use rust_decimal::Decimal;
use uuid::Uuid;

use super::value_objects::OrderStatus;

// ============================================================================
// Order Commands - Represent user intent
// ============================================================================

/// One proposed payment: a card charge, a coupon, or both
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentInstruction {
    pub credit_card_id: Option<Uuid>,
    pub coupon_id: Option<Uuid>,
    /// Requested card charge; ignored for coupon-only entries
    pub amount: Decimal,
}

impl PaymentInstruction {
    pub fn card(credit_card_id: Uuid, amount: Decimal) -> Self {
        Self {
            credit_card_id: Some(credit_card_id),
            coupon_id: None,
            amount,
        }
    }

    pub fn coupon(coupon_id: Uuid) -> Self {
        Self {
            credit_card_id: None,
            coupon_id: Some(coupon_id),
            amount: Decimal::ZERO,
        }
    }
}

/// Turn the customer's cart into an order
#[derive(Debug, Clone)]
pub struct Checkout {
    pub customer_id: Uuid,
    pub delivery_address_id: Uuid,
    pub payments: Vec<PaymentInstruction>,
}

/// Read-side filter; `None` fields match everything
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub customer_id: Option<Uuid>,
}
