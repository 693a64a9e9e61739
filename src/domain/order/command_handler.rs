use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::catalog::Product;
use crate::domain::coupon::command_handler::{issue_exchange_coupon_in, redeem_coupon_in};
use crate::domain::customer::Customer;
use crate::domain::money::round_money;
use crate::errors::ShopResult;
use crate::outbox::{OrderStatusChanged, ShopEvent};
use crate::store::{StoreTx, TransactionalStore, UnitOfWork};

use super::aggregate::Order;
use super::commands::OrderFilter;
use super::value_objects::{OrderStatus, OrderTransition};

// ============================================================================
// Order Lifecycle Service
// ============================================================================
//
// Drives PROCESSING → APPROVED → IN_TRANSIT → DELIVERED (or REJECTED).
// Approval is where the order becomes real:
// - stock leaves inventory for every line
// - coupons used to pay are redeemed
// - coupon value above the total comes back as a change coupon
// - the customer's ranking rises
//
// ============================================================================

/// Code prefix of change coupons issued at approval
pub const CHANGE_COUPON_PREFIX: &str = "CHANGE";

pub struct OrderLifecycleService<S: TransactionalStore> {
    uow: Arc<UnitOfWork<S>>,
    coupon_validity_days: u32,
}

impl<S: TransactionalStore> OrderLifecycleService<S> {
    pub fn new(uow: Arc<UnitOfWork<S>>, coupon_validity_days: u32) -> Self {
        Self {
            uow,
            coupon_validity_days,
        }
    }

    pub async fn approve(&self, order_id: Uuid) -> ShopResult<Order> {
        let order = self
            .uow
            .execute("order.approve", |tx| {
                let mut order = tx.require::<Order>(order_id)?;
                let from = order.apply(OrderTransition::Approve)?;

                for item in &order.items {
                    let mut product = tx.require::<Product>(item.product_id)?;
                    product.commit_stock(item.quantity)?;
                    tx.save(&product)?;
                    debug!(
                        product_id = %product.id,
                        quantity = item.quantity,
                        stock_quantity = product.stock_quantity,
                        "Stock committed"
                    );
                }

                let now = Utc::now();
                let coupon_ids: Vec<Uuid> = order.coupon_ids().collect();
                for coupon_id in coupon_ids {
                    redeem_coupon_in(tx, coupon_id, order.customer_id, order.id, now)?;
                }

                let excess = order.coupon_excess();
                if excess > Decimal::ZERO {
                    let change = issue_exchange_coupon_in(
                        tx,
                        CHANGE_COUPON_PREFIX,
                        order.customer_id,
                        round_money(excess),
                        self.coupon_validity_days,
                    )?;
                    order.change_coupon_id = Some(change.id);
                }

                let mut customer = tx.require::<Customer>(order.customer_id)?;
                let ranking = customer.raise_ranking(order.ranking_increment());
                tx.save(&customer)?;
                debug!(customer_id = %customer.id, %ranking, "Customer ranking raised");

                save_transitioned(tx, &order, from)?;
                Ok(order)
            })
            .await?;

        self.record(OrderTransition::Approve);
        info!(
            order_id = %order.id,
            items = order.items.len(),
            change_coupon = ?order.change_coupon_id,
            "✅ Order approved"
        );
        Ok(order)
    }

    pub async fn reject(&self, order_id: Uuid) -> ShopResult<Order> {
        let order = self
            .uow
            .execute("order.reject", |tx| {
                transition_in(tx, order_id, OrderTransition::Reject)
            })
            .await?;

        self.record(OrderTransition::Reject);
        info!(order_id = %order.id, "❌ Order rejected");
        Ok(order)
    }

    pub async fn dispatch(&self, order_id: Uuid) -> ShopResult<Order> {
        let order = self
            .uow
            .execute("order.dispatch", |tx| {
                transition_in(tx, order_id, OrderTransition::Dispatch)
            })
            .await?;

        self.record(OrderTransition::Dispatch);
        info!(order_id = %order.id, "🚚 Order dispatched");
        Ok(order)
    }

    pub async fn deliver(&self, order_id: Uuid) -> ShopResult<Order> {
        let order = self
            .uow
            .execute("order.deliver", |tx| {
                transition_in(tx, order_id, OrderTransition::Deliver)
            })
            .await?;

        self.record(OrderTransition::Deliver);
        info!(order_id = %order.id, "📬 Order delivered");
        Ok(order)
    }

    pub async fn order(&self, order_id: Uuid) -> ShopResult<Order> {
        self.uow
            .execute("order.get", |tx| tx.require::<Order>(order_id))
            .await
    }

    /// Orders matching `filter`, oldest purchase first
    pub async fn list_orders(&self, filter: OrderFilter) -> ShopResult<Vec<Order>> {
        self.uow
            .execute("order.list", |tx| {
                let mut orders = tx.scan::<Order>(&|o| {
                    filter.status.map_or(true, |s| o.status == s)
                        && filter.customer_id.map_or(true, |c| o.customer_id == c)
                })?;
                orders.sort_by_key(|o| o.purchased_at);
                Ok(orders)
            })
            .await
    }

    fn record(&self, transition: OrderTransition) {
        if let Some(metrics) = self.uow.metrics() {
            metrics.record_order_transition(transition.as_str());
        }
    }
}

/// Load an order, apply one transition and stage the write
fn transition_in<T: StoreTx>(
    tx: &mut T,
    order_id: Uuid,
    transition: OrderTransition,
) -> ShopResult<Order> {
    let mut order = tx.require::<Order>(order_id)?;
    apply_transition_in(tx, &mut order, transition)?;
    Ok(order)
}

/// Apply one transition to an order already loaded in `tx` and stage the
/// write. Returns the status the order left.
pub(crate) fn apply_transition_in<T: StoreTx>(
    tx: &mut T,
    order: &mut Order,
    transition: OrderTransition,
) -> ShopResult<OrderStatus> {
    let from = order.apply(transition)?;
    save_transitioned(tx, order, from)?;
    Ok(from)
}

fn save_transitioned<T: StoreTx>(
    tx: &mut T,
    order: &Order,
    from: OrderStatus,
) -> ShopResult<()> {
    tx.save(order)?;
    tx.record_event(ShopEvent::OrderStatusChanged(OrderStatusChanged {
        order_id: order.id,
        from,
        to: order.status,
    }));
    Ok(())
}
