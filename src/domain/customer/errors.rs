// ============================================================================
// Customer Business Rule Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CustomerError {
    #[error("Email cannot be empty")]
    EmptyEmail,

    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    #[error("Customer name cannot be empty")]
    EmptyName,

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Card number must have at least four digits")]
    InvalidCardNumber,
}
