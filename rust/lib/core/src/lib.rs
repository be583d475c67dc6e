pub mod config;
pub mod error;
pub mod types;

pub use config::{ConfigError, EmptyReportPolicy, ReportConfig, ServiceConfig};
pub use error::ServiceError;
pub use types::new_id;
