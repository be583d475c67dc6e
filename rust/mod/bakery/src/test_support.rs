//! Fault-injecting stores for service tests.

use bakery_kv::{DeleteOp, KVError, KVStore, RedbStore};

fn io_error() -> KVError {
    KVError::Storage("disk full".into())
}

/// Delegates to redb but fails every write path.
pub(crate) struct BrokenWrites(pub(crate) RedbStore);

impl KVStore for BrokenWrites {
    fn get(&self, c: &str, k: &str) -> Result<Option<Vec<u8>>, KVError> {
        self.0.get(c, k)
    }
    fn put(&self, _: &str, _: &str, _: &[u8]) -> Result<(), KVError> {
        Err(io_error())
    }
    fn get_all(&self, c: &str) -> Result<Vec<(String, Vec<u8>)>, KVError> {
        self.0.get_all(c)
    }
    fn delete(&self, _: &str, _: &str) -> Result<(), KVError> {
        Err(io_error())
    }
    fn delete_many(&self, _: &[DeleteOp]) -> Result<(), KVError> {
        Err(io_error())
    }
    fn schema_version(&self) -> u64 {
        self.0.schema_version()
    }
}

/// Delegates to redb but fails every read path.
pub(crate) struct BrokenReads(pub(crate) RedbStore);

impl KVStore for BrokenReads {
    fn get(&self, _: &str, _: &str) -> Result<Option<Vec<u8>>, KVError> {
        Err(io_error())
    }
    fn put(&self, c: &str, k: &str, v: &[u8]) -> Result<(), KVError> {
        self.0.put(c, k, v)
    }
    fn get_all(&self, _: &str) -> Result<Vec<(String, Vec<u8>)>, KVError> {
        Err(io_error())
    }
    fn delete(&self, c: &str, k: &str) -> Result<(), KVError> {
        self.0.delete(c, k)
    }
    fn delete_many(&self, ops: &[DeleteOp]) -> Result<(), KVError> {
        self.0.delete_many(ops)
    }
    fn schema_version(&self) -> u64 {
        self.0.schema_version()
    }
}
