// ============================================================================
// Cart Domain - the customer's basket before checkout
// ============================================================================

pub mod errors;
pub mod aggregate;
pub mod command_handler;

pub use errors::*;
pub use aggregate::*;
pub use command_handler::*;
