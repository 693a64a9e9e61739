// ============================================================================
// Persistence Boundary
// ============================================================================
//
// The core talks to storage only through these traits:
// - Record             - an entity with a table name and a primary key
// - StoreTx            - reads and staged writes inside one transaction
// - TransactionalStore - opens and commits transactions
// - UnitOfWork         - runs one public operation atomically, retrying
//                        on optimistic-concurrency conflicts
//
// memory::InMemoryStore is the reference adapter.
//
// ============================================================================

mod error;
mod record;
mod unit_of_work;
pub mod memory;

pub use error::StoreError;
pub use record::Record;
pub(crate) use record::impl_record;
pub use unit_of_work::UnitOfWork;
pub use memory::{InMemoryStore, MemoryTx};

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::{ShopError, ShopResult};
use crate::outbox::ShopEvent;

/// Reads and staged writes of a single transaction.
///
/// Nothing written through a `StoreTx` is visible to other transactions
/// until [`TransactionalStore::commit`] succeeds. Dropping the transaction
/// discards every staged write and event.
pub trait StoreTx: Send {
    fn load<R: Record>(&mut self, id: Uuid) -> Result<Option<R>, StoreError>;

    fn save<R: Record>(&mut self, record: &R) -> Result<(), StoreError>;

    /// All rows of `R`'s table matching `predicate`, staged writes included
    fn scan<R: Record>(&mut self, predicate: &dyn Fn(&R) -> bool) -> Result<Vec<R>, StoreError>;

    /// Queue an event for the outbox; published only on commit
    fn record_event(&mut self, event: ShopEvent);

    fn require<R: Record>(&mut self, id: Uuid) -> ShopResult<R> {
        self.load::<R>(id)?
            .ok_or_else(|| ShopError::not_found(R::KIND, id))
    }
}

#[async_trait]
pub trait TransactionalStore: Send + Sync + 'static {
    type Tx: StoreTx;

    async fn begin(&self) -> Result<Self::Tx, StoreError>;

    /// Apply every staged write atomically, or none of them
    async fn commit(&self, tx: Self::Tx) -> Result<(), StoreError>;
}
