//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{AuditLogEvent, AuditQuery};
use chrono::{DateTime, Utc};

/// Append-only store for audit log events
///
/// Implemented by the infrastructure layer (spontaneity-audit). Methods take
/// `&self` so a single store can be shared across request handlers.
pub trait AuditLogStore {
    /// Error type for store operations
    type Error;

    /// Append an event to a partner collection (`None` = default collection)
    fn append(&self, event: &AuditLogEvent, partner_id: Option<&str>) -> Result<(), Self::Error>;

    /// Page through a collection, newest first
    fn list(&self, query: &AuditQuery) -> Result<Vec<AuditLogEvent>, Self::Error>;

    /// Count events older than `cutoff` across all collections
    fn count_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize, Self::Error>;

    /// Delete events older than `cutoff` across all collections
    fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize, Self::Error>;
}
