use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::money::marked_up;
use crate::domain::stock::StockError;
use crate::store::impl_record;

use super::errors::CatalogError;
use super::value_objects::{Dimensions, StatusChange, StatusChangeCategory, StatusDirection};

// ============================================================================
// Product - sellable item whose stock and price follow the stock ledger
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    // Identity
    pub id: Uuid,
    pub name: String,

    // Shipping
    pub dimensions: Dimensions,
    pub weight: Decimal,

    // Pricing
    pub pricing_group_id: Uuid,
    pub cost_price: Decimal,
    pub sale_price: Decimal,

    // Inventory
    pub stock_quantity: i32,
    /// Units that left inventory through approved orders
    pub committed_quantity: i32,

    /// Append-only activation log; the last entry decides `is_active`
    pub status_changes: Vec<StatusChange>,

    // Audit Trail
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_record!(Product, "Product");

impl Product {
    /// A new product with an empty ledger, active, priced at zero
    pub fn new(
        name: impl Into<String>,
        dimensions: Dimensions,
        weight: Decimal,
        pricing_group_id: Uuid,
    ) -> Result<Self, CatalogError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CatalogError::EmptyName);
        }
        if weight <= Decimal::ZERO {
            return Err(CatalogError::InvalidWeight(weight));
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            dimensions,
            weight,
            pricing_group_id,
            cost_price: Decimal::ZERO,
            sale_price: Decimal::ZERO,
            stock_quantity: 0,
            committed_quantity: 0,
            status_changes: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_active(&self) -> bool {
        self.status_changes
            .last()
            .map_or(true, StatusChange::is_activation)
    }

    pub fn activate(
        &mut self,
        reason: &str,
        category: StatusChangeCategory,
    ) -> Result<&StatusChange, CatalogError> {
        if self.is_active() {
            return Err(CatalogError::AlreadyActive);
        }
        self.push_status_change(StatusDirection::Activate, reason, category, "activate")
    }

    pub fn deactivate(
        &mut self,
        reason: &str,
        category: StatusChangeCategory,
    ) -> Result<&StatusChange, CatalogError> {
        if !self.is_active() {
            return Err(CatalogError::AlreadyInactive);
        }
        self.push_status_change(StatusDirection::Deactivate, reason, category, "deactivate")
    }

    fn push_status_change(
        &mut self,
        direction: StatusDirection,
        reason: &str,
        category: StatusChangeCategory,
        action: &'static str,
    ) -> Result<&StatusChange, CatalogError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(CatalogError::BlankReason(action));
        }

        let now = Utc::now();
        self.status_changes.push(StatusChange {
            reason: reason.to_string(),
            category,
            direction,
            changed_at: now,
        });
        self.updated_at = now;
        Ok(&self.status_changes[self.status_changes.len() - 1])
    }

    /// Re-derive stock and prices from the ledger totals.
    ///
    /// `ledger_quantity` is the sum of every entry, `max_cost` the highest
    /// cost value ever recorded.
    pub fn apply_ledger(
        &mut self,
        ledger_quantity: i64,
        max_cost: Decimal,
        margin_percentage: Decimal,
    ) -> Result<(), StockError> {
        let on_hand = ledger_quantity - i64::from(self.committed_quantity);
        self.stock_quantity =
            i32::try_from(on_hand).map_err(|_| StockError::QuantityOverflow(self.id))?;
        self.cost_price = max_cost;
        self.sale_price = marked_up(max_cost, margin_percentage);
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn ensure_available(&self, requested: i32) -> Result<(), StockError> {
        if self.stock_quantity < requested {
            return Err(StockError::Insufficient {
                product: self.name.clone(),
                available: self.stock_quantity,
                requested,
            });
        }
        Ok(())
    }

    /// Take `quantity` units out of inventory for an approved order
    pub fn commit_stock(&mut self, quantity: i32) -> Result<(), StockError> {
        if quantity <= 0 {
            return Err(StockError::InvalidQuantity(quantity));
        }
        self.ensure_available(quantity)?;
        let committed = self
            .committed_quantity
            .checked_add(quantity)
            .ok_or(StockError::QuantityOverflow(self.id))?;

        self.stock_quantity -= quantity;
        self.committed_quantity = committed;
        self.updated_at = Utc::now();
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product() -> Product {
        Product::new("Dice Set", Dimensions::default(), dec!(0.3), Uuid::new_v4()).unwrap()
    }

    #[test]
    fn test_new_product_is_active_with_empty_log() {
        let product = product();
        assert!(product.is_active());
        assert!(product.status_changes.is_empty());
        assert_eq!(product.stock_quantity, 0);
    }

    #[test]
    fn test_product_rejects_blank_name_and_bad_weight() {
        let group = Uuid::new_v4();
        assert!(matches!(
            Product::new("  ", Dimensions::default(), dec!(1), group),
            Err(CatalogError::EmptyName)
        ));
        assert!(matches!(
            Product::new("Board", Dimensions::default(), dec!(0), group),
            Err(CatalogError::InvalidWeight(_))
        ));
    }

    #[test]
    fn test_activity_follows_last_status_change() {
        let mut product = product();

        product
            .deactivate("Out of print", StatusChangeCategory::OutOfMarket)
            .unwrap();
        assert!(!product.is_active());

        product
            .activate("Reprinted", StatusChangeCategory::Restocked)
            .unwrap();
        assert!(product.is_active());
        assert_eq!(product.status_changes.len(), 2);
    }

    #[test]
    fn test_redundant_status_change_fails() {
        let mut product = product();
        assert!(matches!(
            product.activate("again", StatusChangeCategory::Manual),
            Err(CatalogError::AlreadyActive)
        ));

        product.deactivate("gone", StatusChangeCategory::Manual).unwrap();
        assert!(matches!(
            product.deactivate("still gone", StatusChangeCategory::Manual),
            Err(CatalogError::AlreadyInactive)
        ));
    }

    #[test]
    fn test_blank_reason_is_rejected() {
        let mut product = product();
        let err = product
            .deactivate("   ", StatusChangeCategory::Manual)
            .unwrap_err();
        assert_eq!(err.to_string(), "A reason is required to deactivate a product");
        assert!(product.is_active());
    }

    #[test]
    fn test_apply_ledger_prices_from_max_cost() {
        let mut product = product();
        product.apply_ledger(7, dec!(50.00), dec!(20)).unwrap();

        assert_eq!(product.stock_quantity, 7);
        assert_eq!(product.cost_price, dec!(50.00));
        assert_eq!(product.sale_price, dec!(60.00));
    }

    #[test]
    fn test_commit_stock_is_not_resurrected_by_ledger() {
        let mut product = product();
        product.apply_ledger(5, dec!(10.00), dec!(0)).unwrap();
        product.commit_stock(3).unwrap();
        assert_eq!(product.stock_quantity, 2);

        // A later entry of 4 units: ledger total 9, 3 already sold
        product.apply_ledger(9, dec!(10.00), dec!(0)).unwrap();
        assert_eq!(product.stock_quantity, 6);
    }

    #[test]
    fn test_commit_stock_never_goes_negative() {
        let mut product = product();
        product.apply_ledger(2, dec!(10.00), dec!(0)).unwrap();

        let err = product.commit_stock(3).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Insufficient stock for product 'Dice Set'. Available: 2, Requested: 3"
        );
        assert_eq!(product.stock_quantity, 2);
        assert_eq!(product.committed_quantity, 0);
    }

    #[test]
    fn test_commit_stock_overflow_is_refused() {
        let mut product = product();
        product.committed_quantity = i32::MAX - 1;
        product.stock_quantity = 5;

        let err = product.commit_stock(2).unwrap_err();
        assert!(matches!(err, StockError::QuantityOverflow(id) if id == product.id));
        assert_eq!(product.stock_quantity, 5);
        assert_eq!(product.committed_quantity, i32::MAX - 1);
    }
}
