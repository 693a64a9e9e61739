use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Record;

use super::errors::CartError;

// ============================================================================
// Cart - one per customer, keyed by the customer's id
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub customer_id: Uuid,
    pub items: Vec<CartItem>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Cart {
    const KIND: &'static str = "Cart";

    fn record_id(&self) -> Uuid {
        self.customer_id
    }
}

impl Cart {
    pub fn new(customer_id: Uuid) -> Self {
        Self {
            customer_id,
            items: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn quantity_of(&self, product_id: Uuid) -> i32 {
        self.items
            .iter()
            .find(|item| item.product_id == product_id)
            .map_or(0, |item| item.quantity)
    }

    /// Add `quantity` units, merging with an existing line for the product
    pub fn add(&mut self, product_id: Uuid, quantity: i32) -> Result<&CartItem, CartError> {
        if quantity <= 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        self.updated_at = Utc::now();

        let index = match self.items.iter().position(|i| i.product_id == product_id) {
            Some(index) => {
                self.items[index].quantity += quantity;
                index
            }
            None => {
                self.items.push(CartItem {
                    product_id,
                    quantity,
                });
                self.items.len() - 1
            }
        };
        Ok(&self.items[index])
    }

    pub fn remove(&mut self, product_id: Uuid) -> Result<CartItem, CartError> {
        let index = self
            .items
            .iter()
            .position(|i| i.product_id == product_id)
            .ok_or(CartError::ItemNotInCart(product_id))?;
        self.updated_at = Utc::now();
        Ok(self.items.remove(index))
    }

    /// Empty the cart after checkout; the cart itself is kept
    pub fn clear(&mut self) {
        self.items.clear();
        self.updated_at = Utc::now();
    }
}
