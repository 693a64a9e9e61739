use rust_decimal::Decimal;
use uuid::Uuid;

use super::value_objects::ExchangeStatus;

// ============================================================================
// Exchange Commands
// ============================================================================

#[derive(Debug, Clone)]
pub struct RequestExchange {
    pub order_id: Uuid,
    pub order_item_id: Uuid,
    pub quantity: i32,
    pub reason: String,
}

/// Goods of an authorized exchange arrived back at the warehouse
#[derive(Debug, Clone)]
pub struct ReceiveExchangeItems {
    pub exchange_id: Uuid,
    pub return_to_stock: bool,
    /// Required when returning to stock
    pub supplier_id: Option<Uuid>,
    /// Required (and positive) when returning to stock
    pub cost_value: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExchangeFilter {
    pub status: Option<ExchangeStatus>,
    pub customer_id: Option<Uuid>,
}
