//! Failure journal
//!
//! Records which client operations failed and why, so failures can be
//! inspected after the fact and survive restarts.

use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::RwLock;
use rusqlite::OptionalExtension;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use slsk_error::{ClientError, ErrorKind, ErrorSnapshot};
use slsk_storage::Database;

use crate::config::{Config, DEFAULT_MAX_FAILURES};
use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub id: String,
    /// Name of the failed operation, e.g. "download"
    pub operation: String,
    /// What the operation targeted, e.g. "alice:/music/a.flac"
    pub subject: Option<String>,
    pub error: ErrorSnapshot,
    pub recorded_at: DateTime<Utc>,
}

impl FailureRecord {
    fn new(operation: &str, subject: Option<&str>, error: &ClientError) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            operation: operation.to_string(),
            subject: subject.map(str::to_string),
            error: error.snapshot(),
            recorded_at: Utc::now(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.error.kind
    }

    /// Rebuild the recorded failure
    pub fn to_error(&self) -> ClientError {
        self.error.clone().into_error()
    }
}

pub struct FailureLog {
    /// Cached records, oldest first
    records: Arc<RwLock<Vec<FailureRecord>>>,
    db: Database,
    max_failures: usize,
}

impl FailureLog {
    pub fn new(db: Database) -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            db,
            max_failures: DEFAULT_MAX_FAILURES,
        }
    }

    /// Keep at most `max_failures` records; 0 disables pruning
    pub fn with_retention(mut self, max_failures: usize) -> Self {
        self.max_failures = max_failures;
        self
    }

    /// Open the database named by `config` and load existing records
    pub fn open(config: &Config) -> Result<Self> {
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database_path)?;
        let log = Self::new(db).with_retention(config.max_failures);
        log.load()?;

        tracing::info!(
            path = %config.database_path.display(),
            failures = log.len(),
            "Opened failure log"
        );

        Ok(log)
    }

    /// Record a failed operation
    pub fn record(
        &self,
        operation: &str,
        subject: Option<&str>,
        error: &ClientError,
    ) -> Result<FailureRecord> {
        let record = FailureRecord::new(operation, subject, error);

        // Cache order must follow insert order across clones
        let mut records = self.records.write();
        self.save_record(&record)?;
        records.push(record.clone());

        match self.prune_stored() {
            Ok(pruned) if !pruned.is_empty() => {
                records.retain(|r| !pruned.contains(&r.id));
                tracing::debug!(pruned = pruned.len(), "Pruned old failure records");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(failure_id = %record.id, "Failed to prune failure log: {}", e);
            }
        }
        drop(records);

        tracing::warn!(
            failure_id = %record.id,
            operation = %record.operation,
            subject = ?record.subject,
            kind = %record.kind(),
            "Recorded failure: {}",
            error
        );

        Ok(record)
    }

    pub fn get(&self, id: &str) -> Result<FailureRecord> {
        self.records
            .read()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| CoreError::FailureNotFound(id.to_string()))
    }

    /// All records, newest first
    pub fn list(&self) -> Vec<FailureRecord> {
        self.records.read().iter().rev().cloned().collect()
    }

    /// Records whose kind is `kind` or one of its specializations, newest first
    pub fn by_kind(&self, kind: ErrorKind) -> Vec<FailureRecord> {
        self.records
            .read()
            .iter()
            .rev()
            .filter(|r| r.kind().is_a(kind))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    pub fn remove(&self, id: &str) -> Result<FailureRecord> {
        let record = self.get(id)?;

        self.db.with_connection(|conn| {
            conn.execute("DELETE FROM failures WHERE id = ?1", [id])?;
            Ok(())
        })?;
        self.records.write().retain(|r| r.id != id);

        tracing::debug!(failure_id = %id, "Removed failure record");

        Ok(record)
    }

    /// Delete every record, returning how many were removed
    pub fn clear(&self) -> Result<usize> {
        let removed = self
            .db
            .with_connection(|conn| Ok(conn.execute("DELETE FROM failures", [])?))?;
        self.records.write().clear();

        tracing::info!(removed, "Cleared failure log");

        Ok(removed)
    }

    /// Load records from database
    pub fn load(&self) -> Result<()> {
        let records = self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, operation, subject, kind, message, causes, recorded_at
                 FROM failures ORDER BY rowid",
            )?;

            let rows: Vec<FailureRow> = stmt
                .query_map([], |row| {
                    Ok(FailureRow {
                        id: row.get(0)?,
                        operation: row.get(1)?,
                        subject: row.get(2)?,
                        kind: row.get(3)?,
                        message: row.get(4)?,
                        causes: row.get(5)?,
                        recorded_at: row.get(6)?,
                    })
                })?
                .filter_map(|r| match r {
                    Ok(row) => Some(row),
                    Err(e) => {
                        tracing::warn!("Skipping failure row with unreadable columns: {}", e);
                        None
                    }
                })
                .collect();

            Ok(rows)
        })?;

        let records: Vec<FailureRecord> = records
            .into_iter()
            .filter_map(|row| {
                let id = row.id.clone();
                match row.into_record() {
                    Ok(record) => Some(record),
                    Err(e) => {
                        tracing::warn!(
                            failure_id = %id,
                            "Skipping unreadable failure record: {}",
                            e
                        );
                        None
                    }
                }
            })
            .collect();

        *self.records.write() = records;

        Ok(())
    }

    fn save_record(&self, record: &FailureRecord) -> Result<()> {
        let causes = serde_json::to_string(&record.error.causes)?;
        Ok(self.db.with_connection(|conn| {
            conn.execute(
                "INSERT INTO failures
                 (id, operation, subject, kind, message, causes, recorded_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    record.id,
                    record.operation,
                    record.subject,
                    record.error.kind.as_str(),
                    record.error.message,
                    causes,
                    record
                        .recorded_at
                        .to_rfc3339_opts(SecondsFormat::Nanos, true),
                ],
            )?;
            Ok(())
        })?)
    }

    /// Delete stored records beyond the retention limit, returning their ids
    fn prune_stored(&self) -> Result<Vec<String>> {
        if self.max_failures == 0 {
            return Ok(Vec::new());
        }

        let limit = i64::try_from(self.max_failures).unwrap_or(i64::MAX);
        let pruned: Vec<String> = self.db.transaction(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id FROM failures ORDER BY rowid DESC LIMIT -1 OFFSET ?1",
            )?;
            let ids: Vec<String> = stmt
                .query_map([limit], |row| row.get(0))?
                .collect::<std::result::Result<_, _>>()?;

            for id in &ids {
                conn.execute("DELETE FROM failures WHERE id = ?1", [id])?;
            }

            Ok(ids)
        })?;

        Ok(pruned)
    }

    /// Whether a record with `id` exists in the database
    pub fn contains(&self, id: &str) -> Result<bool> {
        Ok(self.db.with_connection(|conn| {
            let found: Option<i32> = conn
                .query_row("SELECT 1 FROM failures WHERE id = ?1", [id], |row| row.get(0))
                .optional()?;
            Ok(found.is_some())
        })?)
    }
}

impl Clone for FailureLog {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
            db: self.db.clone(),
            max_failures: self.max_failures,
        }
    }
}

struct FailureRow {
    id: String,
    operation: String,
    subject: Option<String>,
    kind: String,
    message: Option<String>,
    causes: String,
    recorded_at: String,
}

impl FailureRow {
    fn into_record(self) -> Result<FailureRecord> {
        let kind: ErrorKind = self
            .kind
            .parse()
            .map_err(|_| CoreError::UnknownKind(self.kind.clone()))?;
        let causes: Vec<String> = serde_json::from_str(&self.causes)?;
        let recorded_at = DateTime::parse_from_rfc3339(&self.recorded_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                CoreError::CorruptRecord(format!(
                    "invalid recorded_at '{}': {}",
                    self.recorded_at, e
                ))
            })?;

        Ok(FailureRecord {
            id: self.id,
            operation: self.operation,
            subject: self.subject,
            error: ErrorSnapshot {
                kind,
                message: self.message,
                causes,
            },
            recorded_at,
        })
    }
}
