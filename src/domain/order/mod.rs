// ============================================================================
// Order Domain - checkout, payments and the order state machine
// ============================================================================
//
// - Value objects (OrderItem, OrderPayment, OrderStatus, OrderTransition)
// - Commands (Checkout, PaymentInstruction, OrderFilter)
// - Errors (OrderError, CheckoutError, PaymentError)
// - Aggregate (Order, OrderTotals)
// - PaymentAggregator
// - OrderCheckoutService and OrderLifecycleService
//
// ============================================================================

pub mod value_objects;
pub mod commands;
pub mod errors;
pub mod aggregate;
pub mod payment;
pub mod checkout;
pub mod command_handler;

// Re-export for convenience
pub use value_objects::*;
pub use commands::*;
pub use errors::*;
pub use aggregate::*;
pub use payment::*;
pub use checkout::*;
pub use command_handler::*;
