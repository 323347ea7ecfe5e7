//! SLSK Core
//!
//! Coordination layer for the Soulseek client: configuration, logging setup
//! and the persistent journal of failed operations.

mod config;
mod error;
mod failures;

pub use config::{Config, DEFAULT_MAX_FAILURES};
pub use error::CoreError;
pub use failures::{FailureLog, FailureRecord};

// Re-export the failure taxonomy and storage
pub use slsk_error::{Cause, ClientError, ErrorKind, ErrorSnapshot, RecordedCause};
pub use slsk_storage::{Database, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
///
/// `RUST_LOG` wins over `config.log_filter`. Calling this more than once is harmless.
pub fn init_logging(config: &Config) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt().with_env_filter(filter).with_target(true).try_init();
}
