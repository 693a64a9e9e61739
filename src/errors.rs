use thiserror::Error;
use uuid::Uuid;

use crate::domain::catalog::CatalogError;
use crate::domain::cart::CartError;
use crate::domain::coupon::CouponError;
use crate::domain::customer::CustomerError;
use crate::domain::exchange::ExchangeError;
use crate::domain::order::{CheckoutError, OrderError, PaymentError};
use crate::domain::stock::StockError;
use crate::store::StoreError;
use crate::utils::IsTransient;

// ============================================================================
// Shop Errors - what every public operation can fail with
// ============================================================================
//
// NotFound and BusinessRule are the two kinds callers act on. Aggregate
// errors collapse into BusinessRule with their message kept verbatim, so
// the caller can surface it to the user unchanged.
//
// ============================================================================

#[derive(Debug, Error)]
pub enum ShopError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("{0}")]
    BusinessRule(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ShopResult<T> = Result<T, ShopError>;

impl ShopError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn rule(message: impl Into<String>) -> Self {
        Self::BusinessRule(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ShopError::NotFound { .. })
    }

    pub fn is_business_rule(&self) -> bool {
        matches!(self, ShopError::BusinessRule(_))
    }
}

impl IsTransient for ShopError {
    fn is_transient(&self) -> bool {
        match self {
            ShopError::Store(e) => e.is_transient(),
            _ => false,
        }
    }
}

macro_rules! business_rule_from {
    ($($error:ty),+ $(,)?) => {
        $(
            impl From<$error> for ShopError {
                fn from(err: $error) -> Self {
                    ShopError::BusinessRule(err.to_string())
                }
            }
        )+
    };
}

business_rule_from!(
    CatalogError,
    CustomerError,
    CartError,
    CouponError,
    StockError,
    PaymentError,
    CheckoutError,
    OrderError,
    ExchangeError,
);
