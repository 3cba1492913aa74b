//! Spontaneity Audit Log
//!
//! PII-free, append-only record of every recommendation decision.
//!
//! # Architecture
//!
//! - [`create_audit_log_event`] hashes the normalized user input and assembles the record
//! - [`SqliteAuditStore`] implements `AuditLogStore` on SQLite
//! - [`AuditRecorder`] writes events and swallows failures so audit outages never fail a request
//! - [`RetentionSweeper`] / [`RetentionWorker`] enforce the retention window
//!
//! # Examples
//!
//! ```no_run
//! use spontaneity_audit::SqliteAuditStore;
//!
//! let store = SqliteAuditStore::new(":memory:").unwrap();
//! ```

#![warn(missing_docs)]

mod event;
mod recorder;
mod retention;
mod sqlite;

use thiserror::Error;

pub use event::{create_audit_log_event, hash_input_context};
pub use recorder::AuditRecorder;
pub use retention::{
    RetentionConfig, RetentionMetrics, RetentionReport, RetentionSweeper, RetentionWorker,
    MAX_RETENTION_DAYS, MAX_SWEEP_INTERVAL_MINUTES,
};
pub use sqlite::SqliteAuditStore;

/// Errors that can occur during audit log operations
#[derive(Error, Debug)]
pub enum AuditError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Stored row could not be decoded
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Connection mutex was poisoned by a panicking writer
    #[error("Audit store lock poisoned")]
    LockPoisoned,

    /// Error reported by a non-SQLite store
    #[error("Storage error: {0}")]
    Store(String),
}
