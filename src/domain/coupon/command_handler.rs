use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::customer::Customer;
use crate::errors::ShopResult;
use crate::outbox::{CouponIssued, CouponRedeemed, ShopEvent};
use crate::store::{StoreTx, TransactionalStore, UnitOfWork};

use super::aggregate::Coupon;
use super::errors::CouponError;

// ============================================================================
// Coupon Service
// ============================================================================

#[derive(Debug, Clone)]
pub struct CreatePromotionalCoupon {
    pub code: String,
    pub value: Decimal,
    pub expires_at: DateTime<Utc>,
    pub customer_id: Option<Uuid>,
}

pub struct CouponService<S: TransactionalStore> {
    uow: Arc<UnitOfWork<S>>,
}

impl<S: TransactionalStore> CouponService<S> {
    pub fn new(uow: Arc<UnitOfWork<S>>) -> Self {
        Self { uow }
    }

    pub async fn create_promotional(&self, command: CreatePromotionalCoupon) -> ShopResult<Coupon> {
        let coupon = Coupon::promotional(
            &command.code,
            command.value,
            command.expires_at,
            command.customer_id,
        )?;

        self.uow
            .execute("coupon.create_promotional", |tx| {
                if let Some(owner) = coupon.customer_id {
                    tx.require::<Customer>(owner)?;
                }
                let clashes = tx.scan::<Coupon>(&|c| c.code == coupon.code)?;
                if !clashes.is_empty() {
                    return Err(CouponError::DuplicateCode(coupon.code.clone()).into());
                }
                tx.save(&coupon)?;
                tx.record_event(issued_event(&coupon));
                Ok(())
            })
            .await?;

        info!(
            coupon_id = %coupon.id,
            code = %coupon.code,
            value = %coupon.value,
            "🎟️ Promotional coupon created"
        );
        Ok(coupon)
    }

    pub async fn coupon(&self, coupon_id: Uuid) -> ShopResult<Coupon> {
        self.uow
            .execute("coupon.get", |tx| tx.require::<Coupon>(coupon_id))
            .await
    }

    /// Every coupon owned by the customer, newest first
    pub async fn customer_coupons(&self, customer_id: Uuid) -> ShopResult<Vec<Coupon>> {
        self.uow
            .execute("coupon.list", |tx| {
                let mut coupons = tx.scan::<Coupon>(&|c| c.customer_id == Some(customer_id))?;
                coupons.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                Ok(coupons)
            })
            .await
    }
}

/// Issue an exchange-type coupon inside the caller's transaction
pub(crate) fn issue_exchange_coupon_in<T: StoreTx>(
    tx: &mut T,
    prefix: &str,
    customer_id: Uuid,
    value: Decimal,
    validity_days: u32,
) -> ShopResult<Coupon> {
    let code = unique_code_in(tx, || Coupon::exchange_code(prefix))?;
    let coupon = Coupon::exchange(code, customer_id, value, Utc::now(), validity_days)?;
    tx.save(&coupon)?;
    tx.record_event(issued_event(&coupon));
    Ok(coupon)
}

/// Draw codes until one is not taken by any stored coupon
fn unique_code_in<T: StoreTx>(
    tx: &mut T,
    mut next_code: impl FnMut() -> String,
) -> ShopResult<String> {
    loop {
        let code = next_code();
        if tx.scan::<Coupon>(&|c| c.code == code)?.is_empty() {
            return Ok(code);
        }
    }
}

/// Mark a coupon used by `order_id`, inside the caller's transaction
pub(crate) fn redeem_coupon_in<T: StoreTx>(
    tx: &mut T,
    coupon_id: Uuid,
    customer_id: Uuid,
    order_id: Uuid,
    now: DateTime<Utc>,
) -> ShopResult<Coupon> {
    let mut coupon = tx.require::<Coupon>(coupon_id)?;
    coupon.redeem(customer_id, now)?;
    tx.save(&coupon)?;
    tx.record_event(ShopEvent::CouponRedeemed(CouponRedeemed {
        coupon_id,
        order_id,
        value: coupon.value,
    }));
    Ok(coupon)
}

fn issued_event(coupon: &Coupon) -> ShopEvent {
    ShopEvent::CouponIssued(CouponIssued {
        coupon_id: coupon.id,
        code: coupon.code.clone(),
        coupon_type: coupon.coupon_type,
        value: coupon.value,
        customer_id: coupon.customer_id,
        expires_at: coupon.expires_at,
    })
}
