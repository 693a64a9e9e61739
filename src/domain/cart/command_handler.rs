use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::domain::catalog::Product;
use crate::domain::customer::Customer;
use crate::errors::ShopResult;
use crate::store::{StoreTx, TransactionalStore, UnitOfWork};

use super::aggregate::Cart;
use super::errors::CartError;

// ============================================================================
// Cart Service
// ============================================================================

pub struct CartService<S: TransactionalStore> {
    uow: Arc<UnitOfWork<S>>,
}

impl<S: TransactionalStore> CartService<S> {
    pub fn new(uow: Arc<UnitOfWork<S>>) -> Self {
        Self { uow }
    }

    /// Add a product to the customer's cart, creating the cart on first use.
    ///
    /// The merged quantity may not exceed the product's current stock.
    pub async fn add_item(
        &self,
        customer_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> ShopResult<Cart> {
        let cart = self
            .uow
            .execute("cart.add_item", |tx| {
                tx.require::<Customer>(customer_id)?;
                let product = tx.require::<Product>(product_id)?;
                if !product.is_active() {
                    return Err(CartError::ProductInactive(product.name).into());
                }

                let mut cart = tx
                    .load::<Cart>(customer_id)?
                    .unwrap_or_else(|| Cart::new(customer_id));
                let line = cart.add(product_id, quantity)?;
                product.ensure_available(line.quantity)?;

                tx.save(&cart)?;
                Ok(cart)
            })
            .await?;

        debug!(
            customer_id = %customer_id,
            product_id = %product_id,
            quantity,
            "Cart item added"
        );
        Ok(cart)
    }

    pub async fn remove_item(&self, customer_id: Uuid, product_id: Uuid) -> ShopResult<Cart> {
        self.uow
            .execute("cart.remove_item", |tx| {
                let mut cart = tx.require::<Cart>(customer_id)?;
                cart.remove(product_id)?;
                tx.save(&cart)?;
                Ok(cart)
            })
            .await
    }

    /// The customer's cart, empty if they never added anything
    pub async fn view(&self, customer_id: Uuid) -> ShopResult<Cart> {
        self.uow
            .execute("cart.view", |tx| {
                tx.require::<Customer>(customer_id)?;
                Ok(tx
                    .load::<Cart>(customer_id)?
                    .unwrap_or_else(|| Cart::new(customer_id)))
            })
            .await
    }
}
