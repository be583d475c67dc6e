//! Record trait + RecordOps CRUD operations.

use std::marker::PhantomData;
use std::sync::Arc;

use bakery_core::ServiceError;
use bakery_kv::{Collection, DeleteOp, KVError, KVStore};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

/// Trait implemented by models to declare their storage collection.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// The collection this model is stored in, with its key field.
    const COLLECTION: Collection;

    /// Extract the key value from this instance.
    fn key_value(&self) -> String;

    /// Called before every put. Use for auto-fill (ids).
    fn before_save(&mut self) {}
}

/// Map an engine error onto the service taxonomy. `op` picks the variant for
/// ordinary storage failures of the operation being performed.
fn kv_err(op: fn(String) -> ServiceError) -> impl Fn(KVError) -> ServiceError {
    move |e| match e {
        KVError::Unavailable(msg) => ServiceError::StorageUnavailable(msg),
        KVError::Serialization(msg) => ServiceError::Internal(msg),
        other => op(other.to_string()),
    }
}

/// Run a blocking engine call on tokio's blocking pool and wait for it.
async fn blocking<R, F>(f: F) -> Result<R, ServiceError>
where
    F: FnOnce() -> Result<R, ServiceError> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ServiceError::Internal(format!("storage task: {e}")))?
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ServiceError> {
    serde_json::from_slice(bytes).map_err(|e| ServiceError::Internal(format!("deserialize: {e}")))
}

/// CRUD operations for a Record model. Holds a reference to the KV backend.
pub struct RecordOps<T: Record> {
    kv: Arc<dyn KVStore>,
    _phantom: PhantomData<T>,
}

impl<T: Record> Clone for RecordOps<T> {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.kv))
    }
}

impl<T: Record> RecordOps<T> {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self {
            kv,
            _phantom: PhantomData,
        }
    }

    /// Get a record by key value. Returns None if not found.
    pub async fn get(&self, key: &str) -> Result<Option<T>, ServiceError> {
        let kv = Arc::clone(&self.kv);
        let key = key.to_string();
        blocking(move || {
            kv.get(T::COLLECTION.name, &key)
                .map_err(kv_err(ServiceError::Read))?
                .map(|bytes| decode(&bytes))
                .transpose()
        })
        .await
    }

    /// List all records in the collection, in engine order.
    pub async fn list(&self) -> Result<Vec<T>, ServiceError> {
        let kv = Arc::clone(&self.kv);
        blocking(move || {
            let entries = kv
                .get_all(T::COLLECTION.name)
                .map_err(kv_err(ServiceError::Read))?;
            entries.iter().map(|(_key, bytes)| decode(bytes)).collect()
        })
        .await
    }

    /// Insert or fully replace a record. Calls the before_save hook first.
    pub async fn save(&self, mut record: T) -> Result<T, ServiceError> {
        record.before_save();

        let key = record.key_value();
        let bytes = serde_json::to_vec(&record)
            .map_err(|e| ServiceError::Internal(format!("serialize: {e}")))?;

        let kv = Arc::clone(&self.kv);
        blocking(move || {
            kv.put(T::COLLECTION.name, &key, &bytes)
                .map_err(kv_err(ServiceError::Write))?;
            debug!("saved {} '{}'", T::COLLECTION.name, key);
            Ok(())
        })
        .await?;

        Ok(record)
    }

    /// Delete a record by key value. Absent keys are not an error.
    pub async fn delete(&self, key: &str) -> Result<(), ServiceError> {
        let kv = Arc::clone(&self.kv);
        let key = key.to_string();
        blocking(move || {
            kv.delete(T::COLLECTION.name, &key)
                .map_err(kv_err(ServiceError::Delete))
        })
        .await
    }
}

/// Delete across collections as one unit of work.
pub async fn delete_many(kv: &Arc<dyn KVStore>, ops: Vec<DeleteOp>) -> Result<(), ServiceError> {
    let kv = Arc::clone(kv);
    blocking(move || kv.delete_many(&ops).map_err(kv_err(ServiceError::Delete))).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use bakery_kv::{RedbStore, Schema};
    use serde::{Deserialize, Serialize};

    // A minimal test model.
    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Thing {
        id: String,
        name: String,
        count: u32,
    }

    impl Record for Thing {
        const COLLECTION: Collection = Collection::new("things", "id");

        fn key_value(&self) -> String {
            self.id.clone()
        }

        fn before_save(&mut self) {
            if self.id.is_empty() {
                self.id = "auto-id".to_string();
            }
        }
    }

    fn make_ops() -> (RecordOps<Thing>, Arc<dyn KVStore>) {
        let schema = Schema::new(1, vec![Thing::COLLECTION]);
        let kv: Arc<dyn KVStore> = Arc::new(RedbStore::open_in_memory(&schema).unwrap());
        (RecordOps::new(Arc::clone(&kv)), kv)
    }

    #[tokio::test]
    async fn crud_lifecycle() {
        let (ops, _kv) = make_ops();

        let thing = Thing {
            id: String::new(),
            name: "Widget".into(),
            count: 42,
        };
        let created = ops.save(thing).await.unwrap();
        assert_eq!(created.id, "auto-id"); // before_save hook fired

        let fetched = ops.get("auto-id").await.unwrap().unwrap();
        assert_eq!(fetched, created);

        assert_eq!(ops.list().await.unwrap().len(), 1);

        let mut updated = fetched;
        updated.name = "Gadget".into();
        ops.save(updated).await.unwrap();
        assert_eq!(ops.get("auto-id").await.unwrap().unwrap().name, "Gadget");

        ops.delete("auto-id").await.unwrap();
        assert!(ops.get("auto-id").await.unwrap().is_none());
        // Second delete is a no-op.
        ops.delete("auto-id").await.unwrap();
    }

    #[tokio::test]
    async fn corrupt_record_is_internal_error() {
        let (ops, kv) = make_ops();
        kv.put("things", "bad", b"not json").unwrap();

        let err = ops.list().await.unwrap_err();
        assert!(matches!(err, ServiceError::Internal(_)));
    }

    #[tokio::test]
    async fn delete_many_unknown_collection_is_delete_error() {
        let (ops, kv) = make_ops();
        ops.save(Thing { id: "x".into(), name: "A".into(), count: 1 })
            .await
            .unwrap();

        let err = delete_many(
            &kv,
            vec![DeleteOp::new("things", "x"), DeleteOp::new("missing", "x")],
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Delete(_)));
        assert!(ops.get("x").await.unwrap().is_some());
    }

    struct Offline;

    impl KVStore for Offline {
        fn get(&self, _: &str, _: &str) -> Result<Option<Vec<u8>>, KVError> {
            Err(KVError::Storage("io".into()))
        }
        fn put(&self, _: &str, _: &str, _: &[u8]) -> Result<(), KVError> {
            Err(KVError::Storage("io".into()))
        }
        fn get_all(&self, _: &str) -> Result<Vec<(String, Vec<u8>)>, KVError> {
            Err(KVError::Storage("io".into()))
        }
        fn delete(&self, _: &str, _: &str) -> Result<(), KVError> {
            Err(KVError::Unavailable("gone".into()))
        }
        fn delete_many(&self, _: &[DeleteOp]) -> Result<(), KVError> {
            Err(KVError::Storage("io".into()))
        }
        fn schema_version(&self) -> u64 {
            1
        }
    }

    #[tokio::test]
    async fn engine_errors_map_per_operation() {
        let ops: RecordOps<Thing> = RecordOps::new(Arc::new(Offline));

        assert!(matches!(ops.get("x").await.unwrap_err(), ServiceError::Read(_)));
        assert!(matches!(ops.list().await.unwrap_err(), ServiceError::Read(_)));
        let thing = Thing { id: "x".into(), name: "A".into(), count: 1 };
        assert!(matches!(ops.save(thing).await.unwrap_err(), ServiceError::Write(_)));
        assert!(matches!(
            ops.delete("x").await.unwrap_err(),
            ServiceError::StorageUnavailable(_)
        ));
    }
}

