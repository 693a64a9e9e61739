use rust_decimal::{Decimal, RoundingStrategy};

/// Round a monetary amount to cents, half-up
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `cost × (1 + margin / 100)`, rounded to cents
pub fn marked_up(cost: Decimal, margin_percentage: Decimal) -> Decimal {
    round_money(cost * (Decimal::ONE + margin_percentage / Decimal::ONE_HUNDRED))
}
