use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use redb::backends::InMemoryBackend;
use redb::{Database, ReadableTable, TableDefinition, WriteTransaction};
use tracing::{debug, info};

use crate::error::KVError;
use crate::traits::{DeleteOp, KVStore, Schema};

/// Internal bookkeeping table. Not a collection; never visible through KVStore.
const META: TableDefinition<&str, u64> = TableDefinition::new("__meta");
const VERSION_KEY: &str = "schema_version";

fn collection_table(name: &str) -> TableDefinition<'_, &'static str, &'static [u8]> {
    TableDefinition::new(name)
}

fn storage(e: impl std::fmt::Display) -> KVError {
    KVError::Storage(e.to_string())
}

fn unavailable(e: impl std::fmt::Display) -> KVError {
    KVError::Unavailable(e.to_string())
}

/// RedbStore is a KVStore implementation backed by redb, a pure-Rust embedded
/// key-value database. Each collection is a redb table keyed by string.
pub struct RedbStore {
    db: Arc<Database>,
    collections: BTreeSet<String>,
    version: u64,
}

impl RedbStore {
    /// Open or create a redb database at the given path and bring it up to
    /// `schema`.
    pub fn open(path: &Path, schema: &Schema) -> Result<Self, KVError> {
        let db = Database::create(path).map_err(unavailable)?;
        debug!("opened redb database at {}", path.display());
        Self::init(db, schema)
    }

    /// Open a throwaway database that lives only in memory.
    pub fn open_in_memory(schema: &Schema) -> Result<Self, KVError> {
        let db = Database::builder()
            .create_with_backend(InMemoryBackend::new())
            .map_err(unavailable)?;
        Self::init(db, schema)
    }

    fn init(db: Database, schema: &Schema) -> Result<Self, KVError> {
        let write_txn = db.begin_write().map_err(unavailable)?;
        {
            let mut meta = write_txn.open_table(META).map_err(unavailable)?;
            let stored = meta
                .get(VERSION_KEY)
                .map_err(unavailable)?
                .map(|v| v.value());

            match stored {
                Some(v) if v > schema.version => {
                    return Err(KVError::Unavailable(format!(
                        "database schema version {v} is newer than requested {}",
                        schema.version
                    )));
                }
                Some(v) if v == schema.version => {}
                _ => {
                    info!(
                        "upgrading schema from {:?} to {}",
                        stored, schema.version
                    );
                    meta.insert(VERSION_KEY, schema.version)
                        .map_err(unavailable)?;
                }
            }

            // Opening a table in a write transaction creates it when absent.
            for collection in &schema.collections {
                write_txn
                    .open_table(collection_table(collection.name))
                    .map_err(unavailable)?;
            }
        }
        write_txn.commit().map_err(unavailable)?;

        Ok(Self {
            db: Arc::new(db),
            collections: schema
                .collections
                .iter()
                .map(|c| c.name.to_string())
                .collect(),
            version: schema.version,
        })
    }

    fn check_collection(&self, collection: &str) -> Result<(), KVError> {
        if self.collections.contains(collection) {
            Ok(())
        } else {
            Err(KVError::UnknownCollection(collection.to_string()))
        }
    }

    /// Stage every delete on `write_txn`. Stops at the first failure; the
    /// caller decides whether to commit.
    fn stage_deletes(&self, write_txn: &WriteTransaction, ops: &[DeleteOp]) -> Result<(), KVError> {
        for op in ops {
            self.check_collection(&op.collection)?;
            let mut table = write_txn
                .open_table(collection_table(&op.collection))
                .map_err(storage)?;
            table.remove(op.key.as_str()).map_err(storage)?;
        }
        Ok(())
    }
}

impl KVStore for RedbStore {
    fn get(&self, collection: &str, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        self.check_collection(collection)?;
        let read_txn = self.db.begin_read().map_err(storage)?;
        let table = read_txn
            .open_table(collection_table(collection))
            .map_err(storage)?;

        match table.get(key) {
            Ok(Some(val)) => Ok(Some(val.value().to_vec())),
            Ok(None) => Ok(None),
            Err(e) => Err(storage(e)),
        }
    }

    fn put(&self, collection: &str, key: &str, value: &[u8]) -> Result<(), KVError> {
        self.check_collection(collection)?;
        let write_txn = self.db.begin_write().map_err(storage)?;
        {
            let mut table = write_txn
                .open_table(collection_table(collection))
                .map_err(storage)?;
            table.insert(key, value).map_err(storage)?;
        }
        write_txn.commit().map_err(storage)?;
        Ok(())
    }

    fn get_all(&self, collection: &str) -> Result<Vec<(String, Vec<u8>)>, KVError> {
        self.check_collection(collection)?;
        let read_txn = self.db.begin_read().map_err(storage)?;
        let table = read_txn
            .open_table(collection_table(collection))
            .map_err(storage)?;

        let mut results = Vec::new();
        for entry in table.iter().map_err(storage)? {
            let (key, value) = entry.map_err(storage)?;
            results.push((key.value().to_string(), value.value().to_vec()));
        }
        Ok(results)
    }

    fn delete(&self, collection: &str, key: &str) -> Result<(), KVError> {
        self.check_collection(collection)?;
        let write_txn = self.db.begin_write().map_err(storage)?;
        {
            let mut table = write_txn
                .open_table(collection_table(collection))
                .map_err(storage)?;
            table.remove(key).map_err(storage)?;
        }
        write_txn.commit().map_err(storage)?;
        Ok(())
    }

    fn delete_many(&self, ops: &[DeleteOp]) -> Result<(), KVError> {
        let write_txn = self.db.begin_write().map_err(storage)?;
        if let Err(e) = self.stage_deletes(&write_txn, ops) {
            write_txn.abort().map_err(storage)?;
            return Err(e);
        }
        write_txn.commit().map_err(storage)?;
        Ok(())
    }

    fn schema_version(&self) -> u64 {
        self.version
    }
}
