use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::catalog::{StatusChangeCategory, StatusDirection};
use crate::domain::coupon::CouponType;
use crate::domain::exchange::ExchangeStatus;
use crate::domain::order::OrderStatus;

use super::event::DomainEvent;

// ============================================================================
// Shop Events - what committed units of work publish
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum ShopEvent {
    StockEntryRecorded(StockEntryRecorded),
    ProductRepriced(ProductRepriced),
    ProductStatusChanged(ProductStatusChanged),
    OrderPlaced(OrderPlaced),
    OrderStatusChanged(OrderStatusChanged),
    CouponIssued(CouponIssued),
    CouponRedeemed(CouponRedeemed),
    ExchangeStatusChanged(ExchangeStatusChanged),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StockEntryRecorded {
    pub entry_id: Uuid,
    pub product_id: Uuid,
    pub supplier_id: Uuid,
    pub quantity: i32,
    pub cost_value: Decimal,
    pub is_reentry: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ProductRepriced {
    pub product_id: Uuid,
    pub cost_price: Decimal,
    pub sale_price: Decimal,
    pub stock_quantity: i32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ProductStatusChanged {
    pub product_id: Uuid,
    pub direction: StatusDirection,
    pub category: StatusChangeCategory,
    pub reason: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OrderPlaced {
    pub order_id: Uuid,
    pub customer_id: Uuid,
    pub subtotal: Decimal,
    pub freight_cost: Decimal,
    pub total: Decimal,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OrderStatusChanged {
    pub order_id: Uuid,
    pub from: OrderStatus,
    pub to: OrderStatus,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CouponIssued {
    pub coupon_id: Uuid,
    pub code: String,
    pub coupon_type: CouponType,
    pub value: Decimal,
    pub customer_id: Option<Uuid>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CouponRedeemed {
    pub coupon_id: Uuid,
    pub order_id: Uuid,
    pub value: Decimal,
}

/// `from` is `None` when the request was just created
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExchangeStatusChanged {
    pub exchange_id: Uuid,
    pub order_id: Uuid,
    pub from: Option<ExchangeStatus>,
    pub to: ExchangeStatus,
}

impl ShopEvent {
    /// Aggregate type and id the event belongs to
    pub fn aggregate(&self) -> (&'static str, Uuid) {
        match self {
            ShopEvent::StockEntryRecorded(e) => ("Product", e.product_id),
            ShopEvent::ProductRepriced(e) => ("Product", e.product_id),
            ShopEvent::ProductStatusChanged(e) => ("Product", e.product_id),
            ShopEvent::OrderPlaced(e) => ("Order", e.order_id),
            ShopEvent::OrderStatusChanged(e) => ("Order", e.order_id),
            ShopEvent::CouponIssued(e) => ("Coupon", e.coupon_id),
            ShopEvent::CouponRedeemed(e) => ("Coupon", e.coupon_id),
            ShopEvent::ExchangeStatusChanged(e) => ("ExchangeRequest", e.exchange_id),
        }
    }
}

impl DomainEvent for ShopEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ShopEvent::StockEntryRecorded(_) => "StockEntryRecorded",
            ShopEvent::ProductRepriced(_) => "ProductRepriced",
            ShopEvent::ProductStatusChanged(_) => "ProductStatusChanged",
            ShopEvent::OrderPlaced(_) => "OrderPlaced",
            ShopEvent::OrderStatusChanged(_) => "OrderStatusChanged",
            ShopEvent::CouponIssued(_) => "CouponIssued",
            ShopEvent::CouponRedeemed(_) => "CouponRedeemed",
            ShopEvent::ExchangeStatusChanged(_) => "ExchangeStatusChanged",
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_event_serialization_is_tagged() {
        let event = ShopEvent::OrderStatusChanged(OrderStatusChanged {
            order_id: Uuid::new_v4(),
            from: OrderStatus::Processing,
            to: OrderStatus::Approved,
        });

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"OrderStatusChanged\""));
        assert!(json.contains("\"from\":\"PROCESSING\""));

        let deserialized: ShopEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, event);
    }

    #[test]
    fn test_aggregate_routing() {
        let coupon_id = Uuid::new_v4();
        let event = ShopEvent::CouponRedeemed(CouponRedeemed {
            coupon_id,
            order_id: Uuid::new_v4(),
            value: dec!(10.00),
        });

        assert_eq!(event.aggregate(), ("Coupon", coupon_id));
        assert_eq!(event.event_type(), "CouponRedeemed");
    }
}
