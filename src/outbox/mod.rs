// ============================================================================
// Transactional Outbox
// ============================================================================
//
// Units of work stage ShopEvents next to their writes. The store wraps them
// in envelopes only when the unit commits, so consumers never see an event
// for a change that was rolled back.
//
// ============================================================================

pub mod event;
pub mod events;

pub use event::{DomainEvent, EventEnvelope};
pub use events::*;
