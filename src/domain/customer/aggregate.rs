use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::money::round_money;
use crate::store::impl_record;

use super::errors::CustomerError;
use super::value_objects::Email;

// ============================================================================
// Customer
// ============================================================================

/// Ceiling of the loyalty ranking
pub const MAX_RANKING: Decimal = Decimal::from_parts(99_999, 0, 0, false, 2);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: Email,
    /// Loyalty score raised by every approved order
    #[serde(default)]
    pub ranking: Decimal,
    pub created_at: DateTime<Utc>,
}

impl_record!(Customer, "Customer");

impl Customer {
    pub fn new(name: &str, email: &str) -> Result<Self, CustomerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CustomerError::EmptyName);
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: Email::parse(email)?,
            ranking: Decimal::ZERO,
            created_at: Utc::now(),
        })
    }

    /// Add `increment` to the ranking, capped at [`MAX_RANKING`]; returns the new ranking
    pub fn raise_ranking(&mut self, increment: Decimal) -> Decimal {
        self.ranking = round_money((self.ranking + increment).min(MAX_RANKING));
        self.ranking
    }
}
