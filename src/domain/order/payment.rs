use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::coupon::Coupon;
use crate::domain::customer::CreditCard;
use crate::errors::ShopResult;
use crate::store::StoreTx;

use super::commands::PaymentInstruction;
use super::errors::PaymentError;
use super::value_objects::OrderPayment;

// ============================================================================
// Payment Aggregator
// ============================================================================
//
// Two passes over the proposed payments:
// 1. Resolve: every referenced coupon and card must exist; coupons must be
//    spendable by this customer, appear once, at most one promotional
// 2. Allocate: coupons first (highest value first, full value each) while
//    something is left to pay, then cards in the order given, each charged
//    min(remaining, requested)
//
// Nothing is written; the caller persists the payments with the order.
//
// ============================================================================

/// A coupon accepted for allocation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CouponCredit {
    pub coupon_id: Uuid,
    pub value: Decimal,
}

/// Total requested from one card across every instruction naming it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardRequest {
    pub credit_card_id: Uuid,
    pub requested: Decimal,
}

#[derive(Debug, Clone)]
pub struct PaymentAggregator {
    min_card_payment: Decimal,
}

impl PaymentAggregator {
    pub fn new(min_card_payment: Decimal) -> Self {
        Self { min_card_payment }
    }

    pub fn aggregate<T: StoreTx>(
        &self,
        tx: &mut T,
        instructions: &[PaymentInstruction],
        total: Decimal,
        customer_id: Uuid,
        now: DateTime<Utc>,
    ) -> ShopResult<Vec<OrderPayment>> {
        if instructions.is_empty() {
            return Err(PaymentError::NoPayments.into());
        }

        let mut coupons: Vec<(CouponCredit, String)> = Vec::new();
        let mut cards: Vec<CardRequest> = Vec::new();
        let mut has_promotional = false;

        for instruction in instructions {
            if instruction.credit_card_id.is_none() && instruction.coupon_id.is_none() {
                return Err(PaymentError::EmptyInstruction.into());
            }

            if let Some(coupon_id) = instruction.coupon_id {
                let coupon = tx.require::<Coupon>(coupon_id)?;
                coupon.ensure_redeemable(customer_id, now)?;

                if coupons.iter().any(|(c, _)| c.coupon_id == coupon.id) {
                    return Err(PaymentError::DuplicateCoupon(coupon.code).into());
                }
                if coupon.is_promotional() {
                    if has_promotional {
                        return Err(PaymentError::MultiplePromotional.into());
                    }
                    has_promotional = true;
                }

                coupons.push((
                    CouponCredit {
                        coupon_id: coupon.id,
                        value: coupon.value,
                    },
                    coupon.code,
                ));
            }

            if let Some(credit_card_id) = instruction.credit_card_id {
                tx.require::<CreditCard>(credit_card_id)?;
                if instruction.amount <= Decimal::ZERO {
                    return Err(PaymentError::InvalidAmount(instruction.amount).into());
                }

                match cards.iter_mut().find(|c| c.credit_card_id == credit_card_id) {
                    Some(card) => card.requested += instruction.amount,
                    None => cards.push(CardRequest {
                        credit_card_id,
                        requested: instruction.amount,
                    }),
                }
            }
        }

        let credits: Vec<CouponCredit> = coupons.into_iter().map(|(credit, _)| credit).collect();
        Ok(self.allocate(&credits, &cards, total)?)
    }

    /// Turn accepted coupons and card requests into concrete payments
    pub fn allocate(
        &self,
        coupons: &[CouponCredit],
        cards: &[CardRequest],
        total: Decimal,
    ) -> Result<Vec<OrderPayment>, PaymentError> {
        let mut payments = Vec::new();
        let mut remaining = total;

        let mut prioritized = coupons.to_vec();
        prioritized.sort_by(|a, b| b.value.cmp(&a.value));

        for coupon in &prioritized {
            if remaining <= Decimal::ZERO {
                break;
            }
            payments.push(OrderPayment::coupon(coupon.coupon_id, coupon.value));
            remaining -= coupon.value;
        }

        let has_coupon = !prioritized.is_empty();
        for card in cards {
            if remaining <= Decimal::ZERO {
                break;
            }

            let charge = remaining.min(card.requested);
            if charge <= Decimal::ZERO {
                continue;
            }
            if !has_coupon && charge < self.min_card_payment {
                return Err(PaymentError::BelowMinimum {
                    amount: charge,
                    minimum: self.min_card_payment,
                });
            }

            payments.push(OrderPayment::card(card.credit_card_id, charge));
            remaining -= charge;
        }

        let paid: Decimal = payments.iter().map(|p| p.amount).sum();
        if paid < total {
            return Err(PaymentError::InsufficientPayment { paid, total });
        }

        Ok(payments)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
