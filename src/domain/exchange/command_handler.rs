use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::coupon::command_handler::issue_exchange_coupon_in;
use crate::domain::coupon::Coupon;
use crate::domain::money::round_money;
use crate::domain::order::command_handler::apply_transition_in;
use crate::domain::order::{Order, OrderTransition};
use crate::domain::stock::command_handler::record_entry_in;
use crate::domain::stock::{RecordStockEntry, RecordedEntry};
use crate::errors::{ShopError, ShopResult};
use crate::outbox::{ExchangeStatusChanged, ShopEvent};
use crate::store::{StoreTx, TransactionalStore, UnitOfWork};

use super::aggregate::ExchangeRequest;
use super::commands::{ExchangeFilter, ReceiveExchangeItems, RequestExchange};
use super::errors::ExchangeError;
use super::value_objects::ExchangeStatus;

// ============================================================================
// Exchange Workflow Service
// ============================================================================
//
// The only place that moves an order through its exchange statuses. Each
// exchange transition forces exactly one order transition:
//
//   request   REQUESTED             order DELIVERED → IN_EXCHANGE
//   authorize REQUESTED → AUTHORIZED order IN_EXCHANGE → EXCHANGE_AUTHORIZED
//   deny      REQUESTED → DENIED     order IN_EXCHANGE → DELIVERED
//   receive   AUTHORIZED → COMPLETED order EXCHANGE_AUTHORIZED | IN_EXCHANGE → EXCHANGED
//
// Receiving always issues an exchange coupon worth unit price × quantity
// and optionally puts the goods back into the stock ledger as a re-entry.
//
// ============================================================================

/// Code prefix of coupons issued for completed exchanges
pub const EXCHANGE_COUPON_PREFIX: &str = "EXCH";

/// Everything a completed exchange produced
#[derive(Debug, Clone)]
pub struct ExchangeReceipt {
    pub exchange: ExchangeRequest,
    pub coupon: Coupon,
    pub restocked: Option<RecordedEntry>,
}

pub struct ExchangeWorkflowService<S: TransactionalStore> {
    uow: Arc<UnitOfWork<S>>,
    coupon_validity_days: u32,
}

impl<S: TransactionalStore> ExchangeWorkflowService<S> {
    pub fn new(uow: Arc<UnitOfWork<S>>, coupon_validity_days: u32) -> Self {
        Self {
            uow,
            coupon_validity_days,
        }
    }

    pub async fn request(&self, command: RequestExchange) -> ShopResult<ExchangeRequest> {
        let exchange = self
            .uow
            .execute("exchange.request", |tx| {
                let mut order = tx.require::<Order>(command.order_id)?;
                apply_transition_in(tx, &mut order, OrderTransition::OpenExchange)?;

                let item = order
                    .item(command.order_item_id)
                    .ok_or_else(|| ShopError::not_found("OrderItem", command.order_item_id))?;
                let exchange =
                    ExchangeRequest::new(&order, item, command.quantity, &command.reason)?;

                // Validated again at commit: a concurrent insert aborts this unit
                let open = tx.scan::<ExchangeRequest>(&|e| {
                    e.order_item_id == command.order_item_id && e.status.is_open()
                })?;
                if !open.is_empty() {
                    return Err(ExchangeError::AlreadyOpen(command.order_item_id).into());
                }

                tx.save(&exchange)?;
                tx.record_event(status_changed(&exchange, None));
                Ok(exchange)
            })
            .await?;

        self.record("request", OrderTransition::OpenExchange);
        info!(
            exchange_id = %exchange.id,
            order_id = %exchange.order_id,
            quantity = exchange.quantity,
            "🔁 Exchange requested"
        );
        Ok(exchange)
    }

    pub async fn authorize(&self, exchange_id: Uuid) -> ShopResult<ExchangeRequest> {
        let exchange = self
            .uow
            .execute("exchange.authorize", |tx| {
                let mut exchange = tx.require::<ExchangeRequest>(exchange_id)?;
                let from = exchange.authorize()?;

                let mut order = tx.require::<Order>(exchange.order_id)?;
                apply_transition_in(tx, &mut order, OrderTransition::AuthorizeExchange)?;

                tx.save(&exchange)?;
                tx.record_event(status_changed(&exchange, Some(from)));
                Ok(exchange)
            })
            .await?;

        self.record("authorize", OrderTransition::AuthorizeExchange);
        info!(
            exchange_id = %exchange.id,
            order_id = %exchange.order_id,
            "👍 Exchange authorized"
        );
        Ok(exchange)
    }

    pub async fn deny(&self, exchange_id: Uuid) -> ShopResult<ExchangeRequest> {
        let exchange = self
            .uow
            .execute("exchange.deny", |tx| {
                let mut exchange = tx.require::<ExchangeRequest>(exchange_id)?;
                let from = exchange.deny()?;

                let mut order = tx.require::<Order>(exchange.order_id)?;
                apply_transition_in(tx, &mut order, OrderTransition::DenyExchange)?;

                tx.save(&exchange)?;
                tx.record_event(status_changed(&exchange, Some(from)));
                Ok(exchange)
            })
            .await?;

        self.record("deny", OrderTransition::DenyExchange);
        info!(
            exchange_id = %exchange.id,
            order_id = %exchange.order_id,
            "👎 Exchange denied"
        );
        Ok(exchange)
    }

    pub async fn receive_items(
        &self,
        command: ReceiveExchangeItems,
    ) -> ShopResult<ExchangeReceipt> {
        let receipt = self
            .uow
            .execute("exchange.receive_items", |tx| self.receive_in(tx, &command))
            .await?;

        self.record("complete", OrderTransition::CompleteExchange);
        if let (Some(restocked), Some(metrics)) = (&receipt.restocked, self.uow.metrics()) {
            metrics.record_stock_entry(restocked.entry.kind());
        }

        info!(
            exchange_id = %receipt.exchange.id,
            order_id = %receipt.exchange.order_id,
            coupon_code = %receipt.coupon.code,
            coupon_value = %receipt.coupon.value,
            restocked = receipt.restocked.is_some(),
            "📦 Exchange items received"
        );
        Ok(receipt)
    }

    fn receive_in<T: StoreTx>(
        &self,
        tx: &mut T,
        command: &ReceiveExchangeItems,
    ) -> ShopResult<ExchangeReceipt> {
        let mut exchange = tx.require::<ExchangeRequest>(command.exchange_id)?;
        let from = exchange.receive(command.return_to_stock)?;

        let restock = if command.return_to_stock {
            let supplier_id = command.supplier_id.ok_or(ExchangeError::MissingSupplier)?;
            let cost_value = command
                .cost_value
                .filter(|cost| *cost > Decimal::ZERO)
                .ok_or(ExchangeError::InvalidCostValue(command.cost_value))?;
            Some((supplier_id, cost_value))
        } else {
            None
        };

        let mut order = tx.require::<Order>(exchange.order_id)?;
        let item = order
            .item(exchange.order_item_id)
            .ok_or_else(|| ShopError::not_found("OrderItem", exchange.order_item_id))?;
        let coupon_value = round_money(item.unit_price * Decimal::from(exchange.quantity));

        let restocked = match restock {
            Some((supplier_id, cost_value)) => Some(record_entry_in(
                tx,
                &RecordStockEntry {
                    product_id: exchange.product_id,
                    supplier_id,
                    quantity: exchange.quantity,
                    cost_value,
                    entry_date: Utc::now().date_naive(),
                    is_reentry: true,
                },
            )?),
            None => None,
        };

        let coupon = issue_exchange_coupon_in(
            tx,
            EXCHANGE_COUPON_PREFIX,
            order.customer_id,
            coupon_value,
            self.coupon_validity_days,
        )?;
        exchange.coupon_id = Some(coupon.id);

        apply_transition_in(tx, &mut order, OrderTransition::CompleteExchange)?;

        tx.save(&exchange)?;
        tx.record_event(status_changed(&exchange, Some(from)));

        Ok(ExchangeReceipt {
            exchange,
            coupon,
            restocked,
        })
    }

    pub async fn exchange(&self, exchange_id: Uuid) -> ShopResult<ExchangeRequest> {
        self.uow
            .execute("exchange.get", |tx| tx.require::<ExchangeRequest>(exchange_id))
            .await
    }

    /// Exchanges matching `filter`, oldest request first
    pub async fn list_exchanges(
        &self,
        filter: ExchangeFilter,
    ) -> ShopResult<Vec<ExchangeRequest>> {
        self.uow
            .execute("exchange.list", |tx| {
                let mut exchanges = tx.scan::<ExchangeRequest>(&|e| {
                    filter.status.map_or(true, |s| e.status == s)
                        && filter.customer_id.map_or(true, |c| e.customer_id == c)
                })?;
                exchanges.sort_by_key(|e| e.requested_at);
                Ok(exchanges)
            })
            .await
    }

    fn record(&self, exchange_transition: &str, order_transition: OrderTransition) {
        if let Some(metrics) = self.uow.metrics() {
            metrics.record_exchange_transition(exchange_transition);
            metrics.record_order_transition(order_transition.as_str());
        }
    }
}

fn status_changed(exchange: &ExchangeRequest, from: Option<ExchangeStatus>) -> ShopEvent {
    ShopEvent::ExchangeStatusChanged(ExchangeStatusChanged {
        exchange_id: exchange.id,
        order_id: exchange.order_id,
        from,
        to: exchange.status,
    })
}
