use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

use crate::domain::cart::Cart;
use crate::domain::catalog::Product;
use crate::domain::customer::{Address, Customer};
use crate::errors::ShopResult;
use crate::outbox::{OrderPlaced, ShopEvent};
use crate::store::{StoreTx, TransactionalStore, UnitOfWork};

use super::aggregate::{Order, OrderTotals};
use super::commands::Checkout;
use super::errors::CheckoutError;
use super::payment::PaymentAggregator;
use super::value_objects::OrderItem;

// ============================================================================
// Order Checkout Service
// ============================================================================
//
// Cart → Order, in one unit of work:
// 1. Customer and delivery address exist (address usable by the customer)
// 2. Cart has items; every product is active and has the stock requested
// 3. Snapshot lines at current sale price; subtotal, freight, total
// 4. Payments validated and allocated against the total
// 5. Order saved as PROCESSING; cart emptied
//
// Stock is only checked here, never taken. Approval takes it.
//
// ============================================================================

pub struct OrderCheckoutService<S: TransactionalStore> {
    uow: Arc<UnitOfWork<S>>,
    payments: PaymentAggregator,
    freight_rate_per_kg: Decimal,
}

impl<S: TransactionalStore> OrderCheckoutService<S> {
    pub fn new(
        uow: Arc<UnitOfWork<S>>,
        payments: PaymentAggregator,
        freight_rate_per_kg: Decimal,
    ) -> Self {
        Self {
            uow,
            payments,
            freight_rate_per_kg,
        }
    }

    pub async fn checkout(&self, command: Checkout) -> ShopResult<Order> {
        let result = self
            .uow
            .execute("order.checkout", |tx| self.checkout_in(tx, &command))
            .await;

        if let Some(metrics) = self.uow.metrics() {
            metrics.record_checkout(if result.is_ok() { "placed" } else { "rejected" });
        }

        let order = result?;
        info!(
            order_id = %order.id,
            customer_id = %order.customer_id,
            items = order.items.len(),
            total = %order.total,
            "🛒 Order placed"
        );
        Ok(order)
    }

    fn checkout_in<T: StoreTx>(&self, tx: &mut T, command: &Checkout) -> ShopResult<Order> {
        tx.require::<Customer>(command.customer_id)?;
        let address = tx.require::<Address>(command.delivery_address_id)?;
        if !address.usable_by(command.customer_id) {
            return Err(CheckoutError::AddressNotOwned(address.id).into());
        }

        let mut cart = match tx.load::<Cart>(command.customer_id)? {
            Some(cart) if !cart.is_empty() => cart,
            _ => return Err(CheckoutError::EmptyCart.into()),
        };

        let mut items = Vec::with_capacity(cart.items.len());
        let mut total_weight = Decimal::ZERO;
        for line in &cart.items {
            let product = tx.require::<Product>(line.product_id)?;
            if !product.is_active() {
                return Err(CheckoutError::ProductInactive(product.name).into());
            }
            product.ensure_available(line.quantity)?;

            total_weight += product.weight * Decimal::from(line.quantity);
            items.push(OrderItem::snapshot(&product, line.quantity));
        }

        let totals = OrderTotals::compute(&items, total_weight, self.freight_rate_per_kg);
        let payments = self.payments.aggregate(
            tx,
            &command.payments,
            totals.total,
            command.customer_id,
            Utc::now(),
        )?;

        let order = Order::place(
            command.customer_id,
            address.id,
            items,
            totals,
            payments,
        )?;
        tx.save(&order)?;
        tx.record_event(ShopEvent::OrderPlaced(OrderPlaced {
            order_id: order.id,
            customer_id: order.customer_id,
            subtotal: order.subtotal,
            freight_cost: order.freight_cost,
            total: order.total,
        }));

        cart.clear();
        tx.save(&cart)?;

        Ok(order)
    }
}
