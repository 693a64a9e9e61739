// ============================================================================
// Catalog Domain - products, pricing groups, activation log
// ============================================================================

pub mod value_objects;
pub mod commands;
pub mod errors;
pub mod product;
pub mod command_handler;

pub use value_objects::*;
pub use commands::*;
pub use errors::*;
pub use product::*;
pub use command_handler::*;
