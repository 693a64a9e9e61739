// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// Each aggregate has its own subdirectory with some of:
// - Value objects
// - Commands
// - Errors
// - Aggregate implementation
// - Command handler (the service driving the aggregate through a unit of work)
//
// Cross-aggregate flows (checkout, approval, exchanges) live in the command
// handler of the aggregate whose status they drive.
//
// ============================================================================

pub mod money;
pub mod catalog;
pub mod stock;
pub mod customer;
pub mod cart;
pub mod coupon;
pub mod order;
pub mod exchange;
