use uuid::Uuid;

// ============================================================================
// Customer Commands
// ============================================================================

#[derive(Debug, Clone)]
pub struct RegisterCustomer {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct RegisterAddress {
    pub customer_id: Option<Uuid>,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

#[derive(Debug, Clone)]
pub struct RegisterCreditCard {
    pub customer_id: Uuid,
    pub holder_name: String,
    pub card_number: String,
    pub brand: String,
}
