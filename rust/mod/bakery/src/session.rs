use std::sync::Arc;

use bakery_core::{ReportConfig, ServiceConfig, ServiceError};
use bakery_kv::{KVStore, RedbStore, Schema};
use bakery_store::{Record, RecordOps};
use tracing::info;

use crate::model::{Customer, OrderTemplate};
use crate::service::{CustomerService, ReportGenerator, TemplateService};

/// Current persisted layout version. Raising it creates any collection that
/// is missing from an older database; existing records are left as they are.
pub const SCHEMA_VERSION: u64 = 1;

/// The collections this crate persists.
pub fn schema() -> Schema {
    Schema::new(
        SCHEMA_VERSION,
        vec![Customer::COLLECTION, OrderTemplate::COLLECTION],
    )
}

/// An open database plus the settings the services need.
///
/// Open once at startup and hand `&Session` to the services. A failed open
/// is fatal to the session (`ServiceError::StorageUnavailable`).
pub struct Session {
    kv: Arc<dyn KVStore>,
    pub(crate) customers: RecordOps<Customer>,
    pub(crate) templates: RecordOps<OrderTemplate>,
    pub(crate) report: ReportConfig,
}

impl Session {
    /// Open (or create) the database described by `config`.
    pub async fn open(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let path = config.resolve_db_path();
        let store = tokio::task::spawn_blocking(move || {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ServiceError::StorageUnavailable(format!("create {}: {e}", parent.display()))
                })?;
            }
            let store = RedbStore::open(&path, &schema())
                .map_err(|e| ServiceError::StorageUnavailable(e.to_string()))?;
            info!("database opened at {}", path.display());
            Ok::<_, ServiceError>(store)
        })
        .await
        .map_err(|e| ServiceError::Internal(format!("storage task: {e}")))??;

        Ok(Self::with_store(Arc::new(store), config))
    }

    /// Open a session over a database that lives only in memory.
    pub fn open_in_memory(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let store = RedbStore::open_in_memory(&schema())
            .map_err(|e| ServiceError::StorageUnavailable(e.to_string()))?;
        Ok(Self::with_store(Arc::new(store), config))
    }

    /// Build a session over an already opened store.
    pub fn with_store(kv: Arc<dyn KVStore>, config: &ServiceConfig) -> Self {
        Self {
            customers: RecordOps::new(Arc::clone(&kv)),
            templates: RecordOps::new(Arc::clone(&kv)),
            kv,
            report: config.report.clone(),
        }
    }

    pub(crate) fn kv(&self) -> &Arc<dyn KVStore> {
        &self.kv
    }

    pub fn schema_version(&self) -> u64 {
        self.kv.schema_version()
    }

    pub fn customers(&self) -> CustomerService<'_> {
        CustomerService::new(self)
    }

    pub fn templates(&self) -> TemplateService<'_> {
        TemplateService::new(self)
    }

    pub fn reports(&self) -> ReportGenerator<'_> {
        ReportGenerator::new(self)
    }

    /// Release the database handle. The file is closed once no operation
    /// still holds it.
    pub fn shutdown(self) {
        info!("session closed");
    }
}
