// ============================================================================
// Shop Fulfillment - order, exchange and stock-pricing core of a retail shop
// ============================================================================
//
// Layers:
// - domain   aggregates, their rules, and the services that drive them
// - store    persistence boundary and unit of work (in-memory adapter)
// - outbox   events published by committed units of work
// - app      composition of every service over one store
//
// ============================================================================

pub mod app;
pub mod config;
pub mod domain;
pub mod errors;
pub mod metrics;
pub mod outbox;
pub mod store;
pub mod utils;

pub use app::ShopServices;
pub use config::ShopConfig;
pub use errors::{ShopError, ShopResult};
