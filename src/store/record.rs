use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

/// An entity the persistence boundary can store.
///
/// `KIND` names the table (and is the entity name reported in NotFound
/// errors); `record_id` is the primary key within that table.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: &'static str;

    fn record_id(&self) -> Uuid;
}

/// Implements [`Record`] for a struct keyed by its `id` field
macro_rules! impl_record {
    ($ty:ty, $kind:literal) => {
        impl $crate::store::Record for $ty {
            const KIND: &'static str = $kind;

            fn record_id(&self) -> ::uuid::Uuid {
                self.id
            }
        }
    };
}

pub(crate) use impl_record;
