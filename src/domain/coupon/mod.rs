// ============================================================================
// Coupon Domain - promotional and exchange credits
// ============================================================================

pub mod errors;
pub mod aggregate;
pub mod command_handler;

pub use errors::*;
pub use aggregate::*;
pub use command_handler::*;
