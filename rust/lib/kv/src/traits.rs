use crate::error::KVError;

/// A named collection declared when the store is opened.
///
/// `key_field` is informational: records carry their own key and the typed
/// layer above extracts it before calling [`KVStore::put`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collection {
    pub name: &'static str,
    pub key_field: &'static str,
}

impl Collection {
    pub const fn new(name: &'static str, key_field: &'static str) -> Self {
        Self { name, key_field }
    }
}

/// Persisted layout: a schema version plus the collections that must exist.
///
/// Raising `version` is the only migration mechanism. An upgrade creates any
/// missing collection and never rewrites existing data.
#[derive(Debug, Clone)]
pub struct Schema {
    pub version: u64,
    pub collections: Vec<Collection>,
}

impl Schema {
    pub fn new(version: u64, collections: Vec<Collection>) -> Self {
        Self { version, collections }
    }
}

/// One delete inside a [`KVStore::delete_many`] unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOp {
    pub collection: String,
    pub key: String,
}

impl DeleteOp {
    pub fn new(collection: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            key: key.into(),
        }
    }
}

/// KVStore provides durable keyed storage organised into named collections.
///
/// Every collection used must have been declared in the [`Schema`] the store
/// was opened with; anything else fails with `KVError::UnknownCollection`.
pub trait KVStore: Send + Sync {
    /// Get the value stored under `key`. Returns None if the key does not exist.
    fn get(&self, collection: &str, key: &str) -> Result<Option<Vec<u8>>, KVError>;

    /// Insert or overwrite the value stored under `key`.
    fn put(&self, collection: &str, key: &str, value: &[u8]) -> Result<(), KVError>;

    /// Return every (key, value) pair in the collection. Callers must not
    /// rely on the order.
    fn get_all(&self, collection: &str) -> Result<Vec<(String, Vec<u8>)>, KVError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn delete(&self, collection: &str, key: &str) -> Result<(), KVError>;

    /// Apply every delete in a single transaction. Either all of them are
    /// committed or none is.
    fn delete_many(&self, ops: &[DeleteOp]) -> Result<(), KVError>;

    /// Schema version in effect after open.
    fn schema_version(&self) -> u64;
}
