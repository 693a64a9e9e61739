use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::impl_record;

// ============================================================================
// Stock Value Objects
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
}

impl_record!(Supplier, "Supplier");

/// One inbound movement in the stock ledger. Never mutated once saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockEntry {
    pub id: Uuid,
    pub product_id: Uuid,
    pub supplier_id: Uuid,
    pub quantity: i32,
    pub cost_value: Decimal,
    pub entry_date: NaiveDate,
    /// Units coming back from a completed exchange rather than a purchase
    pub is_reentry: bool,
    pub created_at: DateTime<Utc>,
}

impl_record!(StockEntry, "StockEntry");

impl StockEntry {
    pub fn kind(&self) -> &'static str {
        if self.is_reentry {
            "reentry"
        } else {
            "purchase"
        }
    }
}

/// Totals derived from every entry of one product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerSummary {
    pub total_quantity: i64,
    pub max_cost: Decimal,
}

impl LedgerSummary {
    pub fn of<'a>(entries: impl IntoIterator<Item = &'a StockEntry>) -> Self {
        entries.into_iter().fold(
            Self {
                total_quantity: 0,
                max_cost: Decimal::ZERO,
            },
            |acc, entry| Self {
                total_quantity: acc.total_quantity + i64::from(entry.quantity),
                max_cost: acc.max_cost.max(entry.cost_value),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(quantity: i32, cost_value: Decimal) -> StockEntry {
        StockEntry {
            id: Uuid::new_v4(),
            product_id: Uuid::nil(),
            supplier_id: Uuid::nil(),
            quantity,
            cost_value,
            entry_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            is_reentry: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_ledger_summary_sums_quantity_and_keeps_max_cost() {
        let entries = vec![
            entry(5, dec!(40.00)),
            entry(3, dec!(55.10)),
            entry(2, dec!(50.00)),
        ];

        let summary = LedgerSummary::of(&entries);
        assert_eq!(summary.total_quantity, 10);
        assert_eq!(summary.max_cost, dec!(55.10));
    }

    #[test]
    fn test_empty_ledger() {
        let summary = LedgerSummary::of(&Vec::<StockEntry>::new());
        assert_eq!(summary.total_quantity, 0);
        assert_eq!(summary.max_cost, Decimal::ZERO);
    }

    #[test]
    fn test_entry_kind() {
        let mut e = entry(1, dec!(1));
        assert_eq!(e.kind(), "purchase");
        e.is_reentry = true;
        assert_eq!(e.kind(), "reentry");
    }
}
