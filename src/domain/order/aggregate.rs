use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::money::round_money;
use crate::store::impl_record;

use super::errors::OrderError;
use super::value_objects::{OrderItem, OrderPayment, OrderStatus, OrderTransition};

// ============================================================================
// Order Aggregate - Domain Logic
// ============================================================================

/// Money totals of an order, computed once at checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub freight_cost: Decimal,
    pub total: Decimal,
}

impl OrderTotals {
    /// `freight = Σ(weight × quantity) × rate`, rounded to cents
    pub fn compute(
        items: &[OrderItem],
        total_weight: Decimal,
        freight_rate_per_kg: Decimal,
    ) -> Self {
        let subtotal: Decimal = items.iter().map(|item| item.total_price).sum();
        let freight_cost = round_money(total_weight * freight_rate_per_kg);
        Self {
            subtotal,
            freight_cost,
            total: subtotal + freight_cost,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    // Identity
    pub id: Uuid,
    pub customer_id: Uuid,
    pub delivery_address_id: Uuid,

    // Contents (fixed at checkout)
    pub items: Vec<OrderItem>,
    pub payments: Vec<OrderPayment>,
    pub subtotal: Decimal,
    pub freight_cost: Decimal,
    pub total: Decimal,

    pub status: OrderStatus,
    /// Change coupon issued at approval when coupons overpaid the order
    pub change_coupon_id: Option<Uuid>,

    // Timeline
    pub purchased_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub dispatched_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl_record!(Order, "Order");

impl Order {
    pub fn place(
        customer_id: Uuid,
        delivery_address_id: Uuid,
        items: Vec<OrderItem>,
        totals: OrderTotals,
        payments: Vec<OrderPayment>,
    ) -> Result<Self, OrderError> {
        if items.is_empty() {
            return Err(OrderError::EmptyItems);
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            customer_id,
            delivery_address_id,
            items,
            payments,
            subtotal: totals.subtotal,
            freight_cost: totals.freight_cost,
            total: totals.total,
            status: OrderStatus::Processing,
            change_coupon_id: None,
            purchased_at: now,
            approved_at: None,
            dispatched_at: None,
            delivered_at: None,
            updated_at: now,
        })
    }

    /// Move to the transition's target status, returning the previous one.
    ///
    /// Leaves the order untouched when the current status is not a source.
    pub fn apply(&mut self, transition: OrderTransition) -> Result<OrderStatus, OrderError> {
        if !transition.sources().contains(&self.status) {
            return Err(OrderError::InvalidTransition {
                action: transition.action(),
                required: transition.required_label(),
                actual: self.status,
            });
        }

        let now = Utc::now();
        match transition {
            OrderTransition::Approve => self.approved_at = Some(now),
            OrderTransition::Dispatch => self.dispatched_at = Some(now),
            OrderTransition::Deliver => self.delivered_at = Some(now),
            _ => {}
        }

        let previous = self.status;
        self.status = transition.target();
        self.updated_at = now;
        Ok(previous)
    }

    pub fn item(&self, item_id: Uuid) -> Option<&OrderItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    pub fn amount_paid(&self) -> Decimal {
        self.payments.iter().map(|p| p.amount).sum()
    }

    pub fn coupon_ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.payments.iter().filter_map(|p| p.coupon_id)
    }

    /// How much coupon value exceeds the order total, or zero
    pub fn coupon_excess(&self) -> Decimal {
        let coupon_total: Decimal = self
            .payments
            .iter()
            .filter(|p| p.coupon_id.is_some())
            .map(|p| p.amount)
            .sum();
        (coupon_total - self.total).max(Decimal::ZERO)
    }

    /// Ranking earned by approving this order: 1% of the total, 0.10 per unit
    /// and 0.05 per payment, rounded half-up to cents
    pub fn ranking_increment(&self) -> Decimal {
        let units: i64 = self.items.iter().map(|item| i64::from(item.quantity)).sum();
        let sources = self
            .payments
            .iter()
            .filter(|p| p.credit_card_id.is_some() || p.coupon_id.is_some())
            .count();
        round_money(
            round_money(self.total / Decimal::ONE_HUNDRED)
                + Decimal::new(10, 2) * Decimal::from(units)
                + Decimal::new(5, 2) * Decimal::from(sources),
        )
    }

    /// `total == subtotal + freight` and `subtotal == Σ line totals`
    pub fn is_balanced(&self) -> bool {
        let lines: Decimal = self.items.iter().map(|item| item.total_price).sum();
        self.total == self.subtotal + self.freight_cost && self.subtotal == lines
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
