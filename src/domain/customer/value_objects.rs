use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::impl_record;

use super::errors::CustomerError;

// ============================================================================
// Customer Value Objects
// ============================================================================

/// Customer email address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Email(pub String);

impl Email {
    pub fn parse(email: impl Into<String>) -> Result<Self, CustomerError> {
        let email = email.into().trim().to_string();
        if email.is_empty() {
            return Err(CustomerError::EmptyEmail);
        }
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(Self(email)),
            _ => Err(CustomerError::InvalidEmail(email)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Delivery address. `customer_id: None` marks a shared address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub id: Uuid,
    pub customer_id: Option<Uuid>,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

impl_record!(Address, "Address");

impl Address {
    /// Whether `customer_id` may ship to this address
    pub fn usable_by(&self, customer_id: Uuid) -> bool {
        self.customer_id.map_or(true, |owner| owner == customer_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditCard {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub holder_name: String,
    /// Only the last four digits are ever kept
    pub last_four: String,
    pub brand: String,
}

impl_record!(CreditCard, "CreditCard");
