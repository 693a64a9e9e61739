use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Exchange Value Objects
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExchangeStatus {
    Requested,
    Authorized,
    Denied,
    Completed,
}

impl ExchangeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExchangeStatus::Requested => "REQUESTED",
            ExchangeStatus::Authorized => "AUTHORIZED",
            ExchangeStatus::Denied => "DENIED",
            ExchangeStatus::Completed => "COMPLETED",
        }
    }

    /// Blocks a new request for the same order item
    pub fn is_open(&self) -> bool {
        *self != ExchangeStatus::Completed
    }
}

impl fmt::Display for ExchangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
