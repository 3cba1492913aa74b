//! Failure-swallowing audit writer

use spontaneity_domain::traits::AuditLogStore;
use spontaneity_domain::AuditLogEvent;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, warn};

/// Writes audit events without ever failing the caller
///
/// A failed write is logged and dropped so an audit outage cannot break
/// the user-facing request.
pub struct AuditRecorder<S> {
    store: Arc<S>,
}

impl<S> Clone for AuditRecorder<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> AuditRecorder<S>
where
    S: AuditLogStore,
    S::Error: Display,
{
    /// Wrap a shared store
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Underlying store, for reads
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Append an event to the partner collection (or the default one)
    ///
    /// Returns whether the write succeeded; callers are free to ignore it.
    pub fn store_audit_log(&self, event: &AuditLogEvent, partner_id: Option<&str>) -> bool {
        match self.store.append(event, partner_id) {
            Ok(()) => {
                debug!(
                    recommendation_id = %event.recommendation_id,
                    partner = partner_id.unwrap_or("default"),
                    "Audit event stored"
                );
                true
            }
            Err(e) => {
                warn!(
                    recommendation_id = %event.recommendation_id,
                    error = %e,
                    "Failed to store audit event"
                );
                false
            }
        }
    }
}
