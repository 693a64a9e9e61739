use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

// ============================================================================
// Stock Commands
// ============================================================================

#[derive(Debug, Clone)]
pub struct RecordStockEntry {
    pub product_id: Uuid,
    pub supplier_id: Uuid,
    pub quantity: i32,
    pub cost_value: Decimal,
    pub entry_date: NaiveDate,
    pub is_reentry: bool,
}
