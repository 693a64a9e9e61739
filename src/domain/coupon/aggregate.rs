use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::impl_record;

use super::errors::CouponError;

// ============================================================================
// Coupon - redeemable credit, promotional or from a completed exchange
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CouponType {
    Promotional,
    Exchange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    pub id: Uuid,
    pub code: String,
    pub coupon_type: CouponType,
    pub value: Decimal,
    /// `None` means any customer may use it
    pub customer_id: Option<Uuid>,
    pub used: bool,
    pub used_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl_record!(Coupon, "Coupon");

impl Coupon {
    pub fn promotional(
        code: &str,
        value: Decimal,
        expires_at: DateTime<Utc>,
        customer_id: Option<Uuid>,
    ) -> Result<Self, CouponError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(CouponError::BlankCode);
        }
        Self::build(
            code.to_string(),
            CouponType::Promotional,
            value,
            customer_id,
            expires_at,
            Utc::now(),
        )
    }

    /// `prefix` followed by eight random uppercase hex digits
    pub fn exchange_code(prefix: &str) -> String {
        let suffix = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
        format!("{prefix}-{suffix}")
    }

    /// Exchange-type credit for `customer_id`, valid `validity_days` from `issued_at`
    pub fn exchange(
        code: String,
        customer_id: Uuid,
        value: Decimal,
        issued_at: DateTime<Utc>,
        validity_days: u32,
    ) -> Result<Self, CouponError> {
        Self::build(
            code,
            CouponType::Exchange,
            value,
            Some(customer_id),
            issued_at + Duration::days(i64::from(validity_days)),
            issued_at,
        )
    }

    fn build(
        code: String,
        coupon_type: CouponType,
        value: Decimal,
        customer_id: Option<Uuid>,
        expires_at: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, CouponError> {
        if value <= Decimal::ZERO {
            return Err(CouponError::InvalidValue(value));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            code,
            coupon_type,
            value,
            customer_id,
            used: false,
            used_at: None,
            expires_at,
            created_at,
        })
    }

    pub fn is_promotional(&self) -> bool {
        self.coupon_type == CouponType::Promotional
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Fails unless `customer_id` could spend this coupon at `now`
    pub fn ensure_redeemable(
        &self,
        customer_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(), CouponError> {
        if self.used {
            return Err(CouponError::AlreadyUsed(self.code.clone()));
        }
        if self.is_expired(now) {
            return Err(CouponError::Expired(self.code.clone()));
        }
        if self.customer_id.is_some_and(|owner| owner != customer_id) {
            return Err(CouponError::NotOwner(self.code.clone()));
        }
        Ok(())
    }

    pub fn redeem(&mut self, customer_id: Uuid, now: DateTime<Utc>) -> Result<(), CouponError> {
        self.ensure_redeemable(customer_id, now)?;
        self.used = true;
        self.used_at = Some(now);
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
