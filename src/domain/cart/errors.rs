use uuid::Uuid;

// ============================================================================
// Cart Business Rule Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CartError {
    #[error("Invalid item quantity: {0}")]
    InvalidQuantity(i32),

    #[error("Product '{0}' is not available for sale")]
    ProductInactive(String),

    #[error("Product {0} is not in the cart")]
    ItemNotInCart(Uuid),
}
