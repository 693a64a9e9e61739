use std::sync::Arc;
use tracing::{debug, warn};

use crate::errors::ShopResult;
use crate::metrics::Metrics;
use crate::utils::{Backoff, IsTransient, RetryConfig};

use super::TransactionalStore;

// ============================================================================
// Unit of Work
// ============================================================================
//
// begin → run the operation → commit. A business failure returns before
// commit, so the transaction is dropped and nothing is persisted. A commit
// that loses an optimistic-concurrency race re-runs the whole operation,
// re-reading every row and re-checking every precondition.
//
// ============================================================================

pub struct UnitOfWork<S: TransactionalStore> {
    store: Arc<S>,
    retry: RetryConfig,
    metrics: Option<Arc<Metrics>>,
}

impl<S: TransactionalStore> UnitOfWork<S> {
    pub fn new(store: Arc<S>, retry: RetryConfig) -> Self {
        Self {
            store,
            retry,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn metrics(&self) -> Option<&Metrics> {
        self.metrics.as_deref()
    }

    /// Run `work` as one atomic unit named `operation`
    pub async fn execute<T, F>(&self, operation: &'static str, mut work: F) -> ShopResult<T>
    where
        T: Send,
        F: FnMut(&mut S::Tx) -> ShopResult<T> + Send,
    {
        let mut backoff = Backoff::new(&self.retry);

        loop {
            let mut tx = self.store.begin().await?;

            let value = match work(&mut tx) {
                Ok(value) => value,
                Err(error) => {
                    debug!(operation, error = %error, "Unit of work rolled back");
                    return Err(error);
                }
            };

            let error = match self.store.commit(tx).await {
                Ok(()) => return Ok(value),
                Err(error) => error,
            };

            if !error.is_transient() {
                return Err(error.into());
            }

            if let Some(metrics) = &self.metrics {
                metrics.record_conflict(operation);
            }

            match backoff.next_delay() {
                Some(delay) => {
                    warn!(
                        operation,
                        attempt = backoff.attempt(),
                        error = %error,
                        delay_ms = delay.as_millis() as u64,
                        "Unit of work conflicted, retrying after delay"
                    );
                    tokio::time::sleep(delay).await;
                }
                None => {
                    warn!(operation, error = %error, "Unit of work conflicted, attempts exhausted");
                    return Err(error.into());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stock::Supplier;
    use crate::errors::ShopError;
    use crate::store::{InMemoryStore, StoreTx};
    use std::sync::atomic::{AtomicU32, Ordering};
    use uuid::Uuid;

    fn supplier(name: &str) -> Supplier {
        Supplier {
            id: Uuid::new_v4(),
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_business_failure_persists_nothing() {
        let store = Arc::new(InMemoryStore::new());
        let uow = UnitOfWork::new(store.clone(), RetryConfig::default());
        let acme = supplier("Acme");
        let id = acme.id;

        let result: ShopResult<()> = uow
            .execute("test.rollback", |tx| {
                tx.save(&acme)?;
                Err(ShopError::rule("refused"))
            })
            .await;

        assert!(result.unwrap_err().is_business_rule());
        let found = uow
            .execute("test.read", |tx| Ok(tx.load::<Supplier>(id)?))
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_conflict_reruns_operation() {
        let store = Arc::new(InMemoryStore::new());
        let uow = UnitOfWork::new(store.clone(), RetryConfig::default());
        let acme = supplier("Acme");
        let id = acme.id;
        uow.execute("test.seed", |tx| Ok(tx.save(&acme)?)).await.unwrap();

        let attempts = AtomicU32::new(0);
        let renamed = uow
            .execute("test.rename", |tx| {
                let mut row = tx.require::<Supplier>(id)?;
                if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                    // Sneak a competing commit in between our read and our commit
                    store.force_write(&Supplier { id, name: "Rival".into() }).unwrap();
                }
                row.name = format!("{} Ltd", row.name);
                tx.save(&row)?;
                Ok(row)
            })
            .await
            .unwrap();

        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        assert_eq!(renamed.name, "Rival Ltd");
    }

    #[tokio::test]
    async fn test_conflict_surfaces_when_attempts_exhausted() {
        let store = Arc::new(InMemoryStore::new());
        let uow = UnitOfWork::new(store.clone(), RetryConfig::no_retry());
        let acme = supplier("Acme");
        let id = acme.id;
        uow.execute("test.seed", |tx| Ok(tx.save(&acme)?)).await.unwrap();

        let result = uow
            .execute("test.rename", |tx| {
                let mut row = tx.require::<Supplier>(id)?;
                store.force_write(&Supplier { id, name: "Rival".into() }).unwrap();
                row.name = "Mine".into();
                tx.save(&row)?;
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(ShopError::Store(_))));
    }
}
