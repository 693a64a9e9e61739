use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::catalog::{PricingGroup, Product};
use crate::errors::ShopResult;
use crate::outbox::{ProductRepriced, ShopEvent, StockEntryRecorded};
use crate::store::{StoreTx, TransactionalStore, UnitOfWork};

use super::commands::RecordStockEntry;
use super::errors::StockError;
use super::value_objects::{LedgerSummary, StockEntry, Supplier};

// ============================================================================
// Stock Pricing Engine
// ============================================================================
//
// Keeps Product.stock_quantity and Product.sale_price consistent with the
// append-only StockEntry ledger:
// 1. Append the entry
// 2. Re-sum the product's ledger, minus units already committed to orders
// 3. Cost price = highest cost ever recorded
// 4. Sale price = cost × (1 + margin / 100), half-up to cents
//
// ============================================================================

/// Result of one ledger append
#[derive(Debug, Clone)]
pub struct RecordedEntry {
    pub entry: StockEntry,
    pub product: Product,
}

pub struct StockPricingEngine<S: TransactionalStore> {
    uow: Arc<UnitOfWork<S>>,
}

impl<S: TransactionalStore> StockPricingEngine<S> {
    pub fn new(uow: Arc<UnitOfWork<S>>) -> Self {
        Self { uow }
    }

    pub async fn register_supplier(&self, name: &str) -> ShopResult<Supplier> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StockError::EmptySupplierName.into());
        }

        let supplier = Supplier {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        self.uow
            .execute("stock.register_supplier", |tx| Ok(tx.save(&supplier)?))
            .await?;

        info!(supplier_id = %supplier.id, name = %supplier.name, "🏭 Supplier registered");
        Ok(supplier)
    }

    pub async fn record_entry(&self, command: RecordStockEntry) -> ShopResult<RecordedEntry> {
        let recorded = self
            .uow
            .execute("stock.record_entry", |tx| record_entry_in(tx, &command))
            .await?;

        if let Some(metrics) = self.uow.metrics() {
            metrics.record_stock_entry(recorded.entry.kind());
        }

        info!(
            product_id = %recorded.product.id,
            entry_id = %recorded.entry.id,
            quantity = recorded.entry.quantity,
            kind = recorded.entry.kind(),
            stock_quantity = recorded.product.stock_quantity,
            sale_price = %recorded.product.sale_price,
            "📥 Stock entry recorded"
        );
        Ok(recorded)
    }

    /// The product's ledger, oldest entry first
    pub async fn stock_entries(&self, product_id: Uuid) -> ShopResult<Vec<StockEntry>> {
        self.uow
            .execute("stock.entries", |tx| {
                tx.require::<Product>(product_id)?;
                let mut entries = tx.scan::<StockEntry>(&|e| e.product_id == product_id)?;
                entries.sort_by_key(|e| (e.entry_date, e.created_at));
                Ok(entries)
            })
            .await
    }
}

/// Append one entry and re-derive the product, inside the caller's transaction
pub(crate) fn record_entry_in<T: StoreTx>(
    tx: &mut T,
    command: &RecordStockEntry,
) -> ShopResult<RecordedEntry> {
    let mut product = tx.require::<Product>(command.product_id)?;
    tx.require::<Supplier>(command.supplier_id)?;

    if command.quantity <= 0 {
        return Err(StockError::InvalidQuantity(command.quantity).into());
    }
    if command.cost_value <= Decimal::ZERO {
        return Err(StockError::InvalidCostValue(command.cost_value).into());
    }

    let group = tx.require::<PricingGroup>(product.pricing_group_id)?;

    let entry = StockEntry {
        id: Uuid::new_v4(),
        product_id: product.id,
        supplier_id: command.supplier_id,
        quantity: command.quantity,
        cost_value: command.cost_value,
        entry_date: command.entry_date,
        is_reentry: command.is_reentry,
        created_at: Utc::now(),
    };
    tx.save(&entry)?;

    // The scan includes the entry staged above
    let ledger = tx.scan::<StockEntry>(&|e| e.product_id == product.id)?;
    let summary = LedgerSummary::of(&ledger);
    product.apply_ledger(summary.total_quantity, summary.max_cost, group.margin_percentage)?;
    tx.save(&product)?;

    debug!(
        product_id = %product.id,
        ledger_entries = ledger.len(),
        ledger_quantity = summary.total_quantity,
        max_cost = %summary.max_cost,
        "Product re-derived from ledger"
    );

    tx.record_event(ShopEvent::StockEntryRecorded(StockEntryRecorded {
        entry_id: entry.id,
        product_id: product.id,
        supplier_id: entry.supplier_id,
        quantity: entry.quantity,
        cost_value: entry.cost_value,
        is_reentry: entry.is_reentry,
    }));
    tx.record_event(ShopEvent::ProductRepriced(ProductRepriced {
        product_id: product.id,
        cost_price: product.cost_price,
        sale_price: product.sale_price,
        stock_quantity: product.stock_quantity,
    }));

    Ok(RecordedEntry { entry, product })
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::Dimensions;
    use crate::errors::ShopError;
    use crate::store::InMemoryStore;
    use crate::utils::RetryConfig;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    struct Fixture {
        engine: StockPricingEngine<InMemoryStore>,
        store: Arc<InMemoryStore>,
        product_id: Uuid,
        supplier_id: Uuid,
    }

    async fn fixture(margin: Decimal) -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let uow = Arc::new(UnitOfWork::new(store.clone(), RetryConfig::default()));

        let group = PricingGroup {
            id: Uuid::new_v4(),
            name: "Standard".into(),
            margin_percentage: margin,
        };
        let product =
            Product::new("Meeple Pack", Dimensions::default(), dec!(0.5), group.id).unwrap();
        store.force_write(&group).unwrap();
        store.force_write(&product).unwrap();

        let engine = StockPricingEngine::new(uow);
        let supplier = engine.register_supplier("Acme Games").await.unwrap();

        Fixture {
            engine,
            store,
            product_id: product.id,
            supplier_id: supplier.id,
        }
    }

    fn entry(f: &Fixture, quantity: i32, cost_value: Decimal) -> RecordStockEntry {
        RecordStockEntry {
            product_id: f.product_id,
            supplier_id: f.supplier_id,
            quantity,
            cost_value,
            entry_date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            is_reentry: false,
        }
    }

    #[tokio::test]
    async fn test_price_tracks_max_cost() {
        let f = fixture(dec!(20)).await;

        f.engine.record_entry(entry(&f, 4, dec!(40.00))).await.unwrap();
        let recorded = f.engine.record_entry(entry(&f, 6, dec!(50.00))).await.unwrap();
        assert_eq!(recorded.product.cost_price, dec!(50.00));
        assert_eq!(recorded.product.sale_price, dec!(60.00));
        assert_eq!(recorded.product.stock_quantity, 10);

        // A cheaper batch never lowers the price
        let recorded = f.engine.record_entry(entry(&f, 1, dec!(30.00))).await.unwrap();
        assert_eq!(recorded.product.cost_price, dec!(50.00));
        assert_eq!(recorded.product.stock_quantity, 11);
    }

    #[tokio::test]
    async fn test_invalid_entry_persists_nothing() {
        let f = fixture(dec!(10)).await;

        let err = f.engine.record_entry(entry(&f, 0, dec!(10.00))).await.unwrap_err();
        assert!(err.is_business_rule());
        let err = f.engine.record_entry(entry(&f, 3, dec!(0))).await.unwrap_err();
        assert!(err.is_business_rule());

        assert_eq!(f.store.count::<StockEntry>(), 0);
        assert_eq!(f.store.outbox_len(), 0);
    }

    #[tokio::test]
    async fn test_unknown_product_or_supplier_is_not_found() {
        let f = fixture(dec!(10)).await;

        let mut command = entry(&f, 1, dec!(10.00));
        command.supplier_id = Uuid::new_v4();
        let err = f.engine.record_entry(command).await.unwrap_err();
        assert!(matches!(err, ShopError::NotFound { entity: "Supplier", .. }));

        let mut command = entry(&f, 1, dec!(10.00));
        command.product_id = Uuid::new_v4();
        let err = f.engine.record_entry(command).await.unwrap_err();
        assert!(matches!(err, ShopError::NotFound { entity: "Product", .. }));
    }

    #[tokio::test]
    async fn test_stock_entries_lists_ledger_and_emits_events() {
        let f = fixture(dec!(0)).await;
        f.engine.record_entry(entry(&f, 2, dec!(5.00))).await.unwrap();
        f.engine.record_entry(entry(&f, 3, dec!(6.00))).await.unwrap();

        let entries = f.engine.stock_entries(f.product_id).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries.iter().map(|e| e.quantity).sum::<i32>(), 5);

        let events = f.store.drain_outbox();
        let types: Vec<_> = events.iter().map(|e| e.event_type.as_str()).collect();
        assert_eq!(
            types,
            ["StockEntryRecorded", "ProductRepriced", "StockEntryRecorded", "ProductRepriced"]
        );
    }
}
