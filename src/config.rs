use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::utils::RetryConfig;

// ============================================================================
// Shop Configuration
// ============================================================================
//
// Defaults, then environment overrides:
//   SHOP_FREIGHT_RATE_PER_KG   freight per kilogram (2.50)
//   SHOP_EXCHANGE_COUPON_DAYS  validity of exchange and change coupons (90)
//   SHOP_MIN_CARD_PAYMENT      minimum card charge without coupons (10.00)
//   SHOP_UOW_MAX_ATTEMPTS      unit-of-work attempts on conflict (3)
//
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("Invalid configuration document: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopConfig {
    pub freight_rate_per_kg: Decimal,
    pub exchange_coupon_validity_days: u32,
    pub min_card_payment: Decimal,
    pub retry: RetryConfig,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            freight_rate_per_kg: Decimal::new(250, 2),
            exchange_coupon_validity_days: 90,
            min_card_payment: Decimal::new(1000, 2),
            retry: RetryConfig::default(),
        }
    }
}

impl ShopConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(document)?)
    }

    /// Defaults overridden by whatever `lookup` finds
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(rate) = parse(&lookup, "SHOP_FREIGHT_RATE_PER_KG")? {
            config.freight_rate_per_kg = non_negative("SHOP_FREIGHT_RATE_PER_KG", rate)?;
        }
        if let Some(days) = parse(&lookup, "SHOP_EXCHANGE_COUPON_DAYS")? {
            config.exchange_coupon_validity_days = days;
        }
        if let Some(minimum) = parse(&lookup, "SHOP_MIN_CARD_PAYMENT")? {
            config.min_card_payment = non_negative("SHOP_MIN_CARD_PAYMENT", minimum)?;
        }
        if let Some(attempts) = parse::<u32>(&lookup, "SHOP_UOW_MAX_ATTEMPTS")? {
            if attempts == 0 {
                return Err(ConfigError::Invalid {
                    key: "SHOP_UOW_MAX_ATTEMPTS",
                    value: attempts.to_string(),
                });
            }
            config.retry.max_attempts = attempts;
        }

        Ok(config)
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

fn non_negative(key: &'static str, value: Decimal) -> Result<Decimal, ConfigError> {
    if value.is_sign_negative() {
        return Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        });
    }
    Ok(value)
}
