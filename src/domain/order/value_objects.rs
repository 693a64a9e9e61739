use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::catalog::Product;
use crate::domain::money::round_money;

// ============================================================================
// Order Value Objects
// ============================================================================

/// Snapshot of one purchased line; never changes after checkout
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OrderItem {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

impl OrderItem {
    pub fn snapshot(product: &Product, quantity: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_id: product.id,
            product_name: product.name.clone(),
            quantity,
            unit_price: product.sale_price,
            total_price: round_money(product.sale_price * Decimal::from(quantity)),
        }
    }
}

/// One concrete charge backing an order
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OrderPayment {
    pub amount: Decimal,
    pub credit_card_id: Option<Uuid>,
    pub coupon_id: Option<Uuid>,
}

impl OrderPayment {
    pub fn card(credit_card_id: Uuid, amount: Decimal) -> Self {
        Self {
            amount,
            credit_card_id: Some(credit_card_id),
            coupon_id: None,
        }
    }

    pub fn coupon(coupon_id: Uuid, amount: Decimal) -> Self {
        Self {
            amount,
            credit_card_id: None,
            coupon_id: Some(coupon_id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Processing,
    Approved,
    Rejected,
    InTransit,
    Delivered,
    InExchange,
    ExchangeAuthorized,
    Exchanged,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 8] = [
        OrderStatus::Processing,
        OrderStatus::Approved,
        OrderStatus::Rejected,
        OrderStatus::InTransit,
        OrderStatus::Delivered,
        OrderStatus::InExchange,
        OrderStatus::ExchangeAuthorized,
        OrderStatus::Exchanged,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Approved => "APPROVED",
            OrderStatus::Rejected => "REJECTED",
            OrderStatus::InTransit => "IN_TRANSIT",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::InExchange => "IN_EXCHANGE",
            OrderStatus::ExchangeAuthorized => "EXCHANGE_AUTHORIZED",
            OrderStatus::Exchanged => "EXCHANGED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Order Transitions
// ============================================================================
//
// Every status change an order can go through, keyed by the action that
// causes it. Lifecycle actions come from back-office staff; the exchange
// actions are only ever driven by the exchange workflow.
//
//   PROCESSING ─approve─▶ APPROVED ─dispatch─▶ IN_TRANSIT ─deliver─▶ DELIVERED
//        └─reject─▶ REJECTED                                              │
//                                                                open exchange
//   EXCHANGED ◀─complete─ EXCHANGE_AUTHORIZED ◀─authorize─ IN_EXCHANGE ◀──┘
//                                         deny: IN_EXCHANGE ─▶ DELIVERED
//
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderTransition {
    Approve,
    Reject,
    Dispatch,
    Deliver,
    OpenExchange,
    AuthorizeExchange,
    DenyExchange,
    CompleteExchange,
}

impl OrderTransition {
    pub const ALL: [OrderTransition; 8] = [
        OrderTransition::Approve,
        OrderTransition::Reject,
        OrderTransition::Dispatch,
        OrderTransition::Deliver,
        OrderTransition::OpenExchange,
        OrderTransition::AuthorizeExchange,
        OrderTransition::DenyExchange,
        OrderTransition::CompleteExchange,
    ];

    pub fn sources(&self) -> &'static [OrderStatus] {
        use OrderStatus::*;
        match self {
            OrderTransition::Approve | OrderTransition::Reject => &[Processing],
            OrderTransition::Dispatch => &[Approved],
            OrderTransition::Deliver => &[InTransit],
            OrderTransition::OpenExchange => &[Delivered],
            OrderTransition::AuthorizeExchange | OrderTransition::DenyExchange => &[InExchange],
            OrderTransition::CompleteExchange => &[ExchangeAuthorized, InExchange],
        }
    }

    pub fn target(&self) -> OrderStatus {
        match self {
            OrderTransition::Approve => OrderStatus::Approved,
            OrderTransition::Reject => OrderStatus::Rejected,
            OrderTransition::Dispatch => OrderStatus::InTransit,
            OrderTransition::Deliver => OrderStatus::Delivered,
            OrderTransition::OpenExchange => OrderStatus::InExchange,
            OrderTransition::AuthorizeExchange => OrderStatus::ExchangeAuthorized,
            OrderTransition::DenyExchange => OrderStatus::Delivered,
            OrderTransition::CompleteExchange => OrderStatus::Exchanged,
        }
    }

    /// Verb phrase used in "Cannot {action} order" messages
    pub fn action(&self) -> &'static str {
        match self {
            OrderTransition::Approve => "approve",
            OrderTransition::Reject => "reject",
            OrderTransition::Dispatch => "dispatch",
            OrderTransition::Deliver => "deliver",
            OrderTransition::OpenExchange => "open exchange for",
            OrderTransition::AuthorizeExchange => "authorize exchange for",
            OrderTransition::DenyExchange => "deny exchange for",
            OrderTransition::CompleteExchange => "complete exchange for",
        }
    }

    pub fn required_label(&self) -> &'static str {
        match self {
            OrderTransition::CompleteExchange => "EXCHANGE_AUTHORIZED or IN_EXCHANGE",
            other => other.sources()[0].as_str(),
        }
    }

    /// Metric label
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderTransition::Approve => "approve",
            OrderTransition::Reject => "reject",
            OrderTransition::Dispatch => "dispatch",
            OrderTransition::Deliver => "deliver",
            OrderTransition::OpenExchange => "open_exchange",
            OrderTransition::AuthorizeExchange => "authorize_exchange",
            OrderTransition::DenyExchange => "deny_exchange",
            OrderTransition::CompleteExchange => "complete_exchange",
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_serialization() {
        let json = serde_json::to_string(&OrderStatus::ExchangeAuthorized).unwrap();
        assert_eq!(json, "\"EXCHANGE_AUTHORIZED\"");

        for status in OrderStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            let deserialized: OrderStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(status, deserialized);
            assert_eq!(json, format!("\"{}\"", status));
        }
    }

    #[test]
    fn test_required_labels() {
        assert_eq!(OrderTransition::Approve.required_label(), "PROCESSING");
        assert_eq!(OrderTransition::Deliver.required_label(), "IN_TRANSIT");
        assert_eq!(
            OrderTransition::CompleteExchange.required_label(),
            "EXCHANGE_AUTHORIZED or IN_EXCHANGE"
        );
    }
}
