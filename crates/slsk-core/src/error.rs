//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] slsk_storage::StorageError),

    #[error("Client error: {0}")]
    Client(#[from] slsk_error::ClientError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failure record not found: {0}")]
    FailureNotFound(String),

    #[error("Unknown error kind: {0}")]
    UnknownKind(String),

    #[error("Corrupt failure record: {0}")]
    CorruptRecord(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
