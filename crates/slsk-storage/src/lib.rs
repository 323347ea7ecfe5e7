//! SLSK Storage Layer
//!
//! SQLite-based persistence for the failure journal.
//! Multi-statement writes go through [`Database::transaction`].

mod database;
mod error;
mod migrations;

pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
