use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::outbox::{EventEnvelope, ShopEvent};

use super::{Record, StoreError, StoreTx, TransactionalStore};

// ============================================================================
// In-Memory Store - versioned rows with optimistic concurrency
// ============================================================================
//
// Rows are JSON documents keyed by (table, id), each carrying a version.
// A transaction remembers the version of every row it touched and the
// generation of every table it scanned. Commit re-checks both under the
// write lock; any mismatch aborts the whole commit with a conflict:
// 1. Row versions catch lost updates (two approvals decrementing one product)
// 2. Table generations catch phantoms (two open exchanges for one item)
//
// ============================================================================

type RowKey = (&'static str, Uuid);

#[derive(Debug)]
struct Row {
    version: u64,
    document: serde_json::Value,
}

#[derive(Debug, Default)]
struct Tables {
    rows: HashMap<RowKey, Row>,
    generations: HashMap<&'static str, u64>,
}

impl Tables {
    fn version_of(&self, key: &RowKey) -> Option<u64> {
        self.rows.get(key).map(|row| row.version)
    }

    fn generation_of(&self, kind: &'static str) -> u64 {
        self.generations.get(kind).copied().unwrap_or(0)
    }

    fn put(&mut self, key: RowKey, document: serde_json::Value) {
        let version = self.version_of(&key).map_or(1, |v| v + 1);
        *self.generations.entry(key.0).or_insert(0) += 1;
        self.rows.insert(key, Row { version, document });
    }
}

#[derive(Debug, Default)]
struct Outbox {
    sequence: i64,
    pending: Vec<EventEnvelope<ShopEvent>>,
}

#[derive(Debug, Default)]
struct Shared {
    tables: RwLock<Tables>,
    outbox: Mutex<Outbox>,
}

/// Thread-safe in-memory implementation of [`TransactionalStore`]
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    shared: Arc<Shared>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a row outside any transaction, bumping its version.
    ///
    /// Used to seed reference data and to simulate a competing commit.
    pub fn force_write<R: Record>(&self, record: &R) -> Result<(), StoreError> {
        let document = encode(record)?;
        self.shared
            .tables
            .write()
            .put((R::KIND, record.record_id()), document);
        Ok(())
    }

    /// Number of rows in `R`'s table
    pub fn count<R: Record>(&self) -> usize {
        self.shared
            .tables
            .read()
            .rows
            .keys()
            .filter(|(kind, _)| *kind == R::KIND)
            .count()
    }

    /// Hand every committed event to the caller, oldest first
    pub fn drain_outbox(&self) -> Vec<EventEnvelope<ShopEvent>> {
        std::mem::take(&mut self.shared.outbox.lock().pending)
    }

    pub fn outbox_len(&self) -> usize {
        self.shared.outbox.lock().pending.len()
    }
}

#[async_trait]
impl TransactionalStore for InMemoryStore {
    type Tx = MemoryTx;

    async fn begin(&self) -> Result<MemoryTx, StoreError> {
        Ok(MemoryTx {
            shared: self.shared.clone(),
            id: Uuid::now_v7(),
            reads: HashMap::new(),
            writes: HashMap::new(),
            scans: HashMap::new(),
            events: Vec::new(),
        })
    }

    async fn commit(&self, tx: MemoryTx) -> Result<(), StoreError> {
        let MemoryTx { id, reads, writes, scans, events, .. } = tx;
        let mut tables = self.shared.tables.write();

        for (key, expected) in &reads {
            let found = tables.version_of(key);
            if found != *expected {
                return Err(StoreError::ConcurrencyConflict {
                    kind: key.0,
                    id: key.1,
                    expected: *expected,
                    found,
                });
            }
        }

        for (kind, expected) in &scans {
            let found = tables.generation_of(*kind);
            if found != *expected {
                return Err(StoreError::ScanConflict {
                    kind: *kind,
                    expected: *expected,
                    found,
                });
            }
        }

        let write_count = writes.len();
        for (key, document) in writes {
            tables.put(key, document);
        }

        // Still under the table lock so outbox order matches commit order
        let event_count = events.len();
        let mut outbox = self.shared.outbox.lock();
        for event in events {
            outbox.sequence += 1;
            let (aggregate_type, aggregate_id) = event.aggregate();
            let envelope =
                EventEnvelope::new(aggregate_id, aggregate_type, outbox.sequence, event, id);
            outbox.pending.push(envelope);
        }

        tracing::debug!(
            tx_id = %id,
            writes = write_count,
            events = event_count,
            "Committed transaction"
        );

        Ok(())
    }
}

/// A transaction against [`InMemoryStore`]
pub struct MemoryTx {
    shared: Arc<Shared>,
    id: Uuid,
    reads: HashMap<RowKey, Option<u64>>,
    writes: HashMap<RowKey, serde_json::Value>,
    scans: HashMap<&'static str, u64>,
    events: Vec<ShopEvent>,
}

impl StoreTx for MemoryTx {
    fn load<R: Record>(&mut self, id: Uuid) -> Result<Option<R>, StoreError> {
        let key = (R::KIND, id);
        if let Some(staged) = self.writes.get(&key) {
            return decode::<R>(staged.clone()).map(Some);
        }

        let tables = self.shared.tables.read();
        let row = tables.rows.get(&key);
        self.reads.entry(key).or_insert(row.map(|r| r.version));

        row.map(|r| decode::<R>(r.document.clone())).transpose()
    }

    fn save<R: Record>(&mut self, record: &R) -> Result<(), StoreError> {
        let key = (R::KIND, record.record_id());
        let document = encode(record)?;

        if !self.reads.contains_key(&key) {
            let version = self.shared.tables.read().version_of(&key);
            self.reads.insert(key, version);
        }
        self.writes.insert(key, document);
        Ok(())
    }

    fn scan<R: Record>(&mut self, predicate: &dyn Fn(&R) -> bool) -> Result<Vec<R>, StoreError> {
        let tables = self.shared.tables.read();
        self.scans
            .entry(R::KIND)
            .or_insert(tables.generation_of(R::KIND));

        let committed = tables
            .rows
            .iter()
            .filter(|((kind, _), _)| *kind == R::KIND)
            .filter(|(key, _)| !self.writes.contains_key(*key))
            .map(|(_, row)| &row.document);
        let staged = self
            .writes
            .iter()
            .filter(|((kind, _), _)| *kind == R::KIND)
            .map(|(_, document)| document);

        let mut matches = Vec::new();
        for document in committed.chain(staged) {
            let record = decode::<R>(document.clone())?;
            if predicate(&record) {
                matches.push(record);
            }
        }
        Ok(matches)
    }

    fn record_event(&mut self, event: ShopEvent) {
        self.events.push(event);
    }
}

fn encode<R: Record>(record: &R) -> Result<serde_json::Value, StoreError> {
    serde_json::to_value(record).map_err(|source| StoreError::Serialization {
        kind: R::KIND,
        source,
    })
}

fn decode<R: Record>(document: serde_json::Value) -> Result<R, StoreError> {
    serde_json::from_value(document).map_err(|source| StoreError::Serialization {
        kind: R::KIND,
        source,
    })
}

// ============================================================================
// Unit Tests
// ============================================================================
