use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::order::{Order, OrderItem};
use crate::store::impl_record;

use super::errors::ExchangeError;
use super::value_objects::ExchangeStatus;

// ============================================================================
// Exchange Request
// ============================================================================
//
// REQUESTED ──authorize──▶ AUTHORIZED ──receive──▶ COMPLETED
//     └──deny──▶ DENIED
//
// Holds references to its order and order item; the coupon it issues on
// completion is recorded by id.
//
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRequest {
    pub id: Uuid,
    pub order_id: Uuid,
    pub order_item_id: Uuid,
    pub customer_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub reason: String,
    pub status: ExchangeStatus,
    pub return_to_stock: bool,
    pub coupon_id: Option<Uuid>,

    pub requested_at: DateTime<Utc>,
    pub authorized_at: Option<DateTime<Utc>>,
    pub denied_at: Option<DateTime<Utc>>,
    pub received_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl_record!(ExchangeRequest, "ExchangeRequest");

impl ExchangeRequest {
    pub fn new(
        order: &Order,
        item: &OrderItem,
        quantity: i32,
        reason: &str,
    ) -> Result<Self, ExchangeError> {
        if quantity <= 0 {
            return Err(ExchangeError::InvalidQuantity(quantity));
        }
        if quantity > item.quantity {
            return Err(ExchangeError::QuantityExceedsItem {
                requested: quantity,
                purchased: item.quantity,
            });
        }
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ExchangeError::BlankReason);
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            order_id: order.id,
            order_item_id: item.id,
            customer_id: order.customer_id,
            product_id: item.product_id,
            quantity,
            reason: reason.to_string(),
            status: ExchangeStatus::Requested,
            return_to_stock: false,
            coupon_id: None,
            requested_at: now,
            authorized_at: None,
            denied_at: None,
            received_at: None,
            updated_at: now,
        })
    }

    pub fn authorize(&mut self) -> Result<ExchangeStatus, ExchangeError> {
        let from = self.advance(
            "authorize",
            ExchangeStatus::Requested,
            ExchangeStatus::Authorized,
        )?;
        self.authorized_at = Some(self.updated_at);
        Ok(from)
    }

    pub fn deny(&mut self) -> Result<ExchangeStatus, ExchangeError> {
        let from = self.advance("deny", ExchangeStatus::Requested, ExchangeStatus::Denied)?;
        self.denied_at = Some(self.updated_at);
        Ok(from)
    }

    pub fn receive(&mut self, return_to_stock: bool) -> Result<ExchangeStatus, ExchangeError> {
        let from = self.advance(
            "receive items for",
            ExchangeStatus::Authorized,
            ExchangeStatus::Completed,
        )?;
        self.return_to_stock = return_to_stock;
        self.received_at = Some(self.updated_at);
        Ok(from)
    }

    fn advance(
        &mut self,
        action: &'static str,
        required: ExchangeStatus,
        target: ExchangeStatus,
    ) -> Result<ExchangeStatus, ExchangeError> {
        if self.status != required {
            return Err(ExchangeError::InvalidTransition {
                action,
                required,
                actual: self.status,
            });
        }
        let from = self.status;
        self.status = target;
        self.updated_at = Utc::now();
        Ok(from)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
