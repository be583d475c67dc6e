use thiserror::Error;

// ── Error codes ─────────────────────────────────────────────────────
//
// Stable, machine-readable identifiers. Callers match on these,
// never on the human-readable message string.

/// Stable error code constants.
pub mod error_code {
    pub const STORAGE_UNAVAILABLE: &str = "STORAGE_UNAVAILABLE";
    pub const WRITE_ERROR: &str = "WRITE_ERROR";
    pub const READ_ERROR: &str = "READ_ERROR";
    pub const DELETE_ERROR: &str = "DELETE_ERROR";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const INTERNAL: &str = "INTERNAL";
}

// ── ServiceError ────────────────────────────────────────────────────

/// Unified service error type.
///
/// `StorageUnavailable` is fatal to the session and surfaces once, at open.
/// The per-operation variants are recoverable by repeating the user action;
/// nothing is retried automatically.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The storage engine could not be initialised.
    #[error("{0}")]
    StorageUnavailable(String),

    /// A put failed.
    #[error("{0}")]
    Write(String),

    /// A read failed.
    #[error("{0}")]
    Read(String),

    /// A delete failed. No data was modified.
    #[error("{0}")]
    Delete(String),

    /// Input was rejected before any storage call.
    #[error("{0}")]
    Validation(String),

    /// Unexpected internal error (encoding, runtime).
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    /// Stable, machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::StorageUnavailable(_) => error_code::STORAGE_UNAVAILABLE,
            ServiceError::Write(_) => error_code::WRITE_ERROR,
            ServiceError::Read(_) => error_code::READ_ERROR,
            ServiceError::Delete(_) => error_code::DELETE_ERROR,
            ServiceError::Validation(_) => error_code::VALIDATION_FAILED,
            ServiceError::Internal(_) => error_code::INTERNAL,
        }
    }

    /// Short notification text for the person using the application.
    ///
    /// Validation messages are shown as-is; storage failures get a fixed
    /// sentence since their detail is only useful in logs.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::StorageUnavailable(_) => {
                "The local database could not be started.".to_string()
            }
            ServiceError::Write(_) => "There was an error saving the record.".to_string(),
            ServiceError::Read(_) => "There was an error loading the records.".to_string(),
            ServiceError::Delete(_) => "There was an error deleting the record.".to_string(),
            ServiceError::Validation(msg) => msg.clone(),
            ServiceError::Internal(_) => "Unexpected internal error.".to_string(),
        }
    }

    /// Whether the whole session is unusable after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ServiceError::StorageUnavailable(_))
    }
}
