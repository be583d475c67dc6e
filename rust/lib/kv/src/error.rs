use thiserror::Error;

#[derive(Error, Debug)]
pub enum KVError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
