//! SQLite implementation of `AuditLogStore`

use crate::AuditError;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use spontaneity_domain::traits::AuditLogStore;
use spontaneity_domain::{AuditLogEvent, AuditQuery, ConfidenceLevel, TrustBadge, TrustSignals};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

const SELECT_COLUMNS: &str = "SELECT recommendation_id, input_context_hash, trust_badge, policy_applied,
        generated_at_us, model_version, confidence_level, signals_summary
     FROM audit_logs";

/// SQLite-backed audit log
///
/// The connection sits behind a mutex so one store can be shared by all
/// request handlers. Every write is a single-row insert.
pub struct SqliteAuditStore {
    conn: Mutex<Connection>,
}

impl SqliteAuditStore {
    /// Open (or create) the audit database at `path`
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, AuditError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, AuditError> {
        self.conn.lock().map_err(|_| AuditError::LockPoisoned)
    }

    /// Total number of stored events across all collections
    pub fn count(&self) -> Result<usize, AuditError> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM audit_logs", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn decode_failure(column: usize, kind: rusqlite::types::Type, message: String) -> rusqlite::Error {
        rusqlite::Error::FromSqlConversionFailure(column, kind, Box::new(AuditError::InvalidData(message)))
    }

    fn row_to_event(row: &rusqlite::Row<'_>) -> rusqlite::Result<AuditLogEvent> {
        use rusqlite::types::Type;

        let id: String = row.get(0)?;
        let recommendation_id = Uuid::parse_str(&id)
            .map_err(|e| Self::decode_failure(0, Type::Text, format!("Bad recommendation id: {}", e)))?;

        let badge: String = row.get(2)?;
        let trust_badge = TrustBadge::parse(&badge)
            .ok_or_else(|| Self::decode_failure(2, Type::Text, format!("Unknown badge: {}", badge)))?;

        let micros: i64 = row.get(4)?;
        let generated_at = DateTime::<Utc>::from_timestamp_micros(micros)
            .ok_or_else(|| Self::decode_failure(4, Type::Integer, format!("Bad timestamp: {}", micros)))?;

        let level: String = row.get(6)?;
        let confidence_level = ConfidenceLevel::parse(&level)
            .ok_or_else(|| Self::decode_failure(6, Type::Text, format!("Unknown confidence: {}", level)))?;

        let summary: String = row.get(7)?;
        let signals_summary: TrustSignals = serde_json::from_str(&summary)
            .map_err(|e| Self::decode_failure(7, Type::Text, format!("Bad signals: {}", e)))?;

        Ok(AuditLogEvent {
            recommendation_id,
            input_context_hash: row.get(1)?,
            trust_badge,
            policy_applied: row.get(3)?,
            generated_at,
            model_version: row.get(5)?,
            confidence_level,
            signals_summary,
        })
    }
}

impl AuditLogStore for SqliteAuditStore {
    type Error = AuditError;

    fn append(&self, event: &AuditLogEvent, partner_id: Option<&str>) -> Result<(), Self::Error> {
        let signals = serde_json::to_string(&event.signals_summary)
            .map_err(|e| AuditError::InvalidData(e.to_string()))?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO audit_logs (recommendation_id, partner_id, input_context_hash, trust_badge,
                policy_applied, generated_at_us, model_version, confidence_level, signals_summary)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                event.recommendation_id.to_string(),
                partner_id,
                &event.input_context_hash,
                event.trust_badge.as_str(),
                &event.policy_applied,
                event.generated_at.timestamp_micros(),
                &event.model_version,
                event.confidence_level.as_str(),
                signals,
            ],
        )?;

        Ok(())
    }

    fn list(&self, query: &AuditQuery) -> Result<Vec<AuditLogEvent>, Self::Error> {
        let mut sql = format!("{} WHERE partner_id IS ?", SELECT_COLUMNS);
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(query.partner_id.clone())];

        if let Some(start_after) = query.start_after {
            sql.push_str(" AND generated_at_us < ?");
            params.push(Box::new(start_after.timestamp_micros()));
        }

        sql.push_str(" ORDER BY generated_at_us DESC, recommendation_id DESC LIMIT ?");
        params.push(Box::new(query.limit as i64));

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let events = stmt
            .query_map(&param_refs[..], Self::row_to_event)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(events)
    }

    fn count_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize, Self::Error> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM audit_logs WHERE generated_at_us < ?1",
            params![cutoff.timestamp_micros()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize, Self::Error> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM audit_logs WHERE generated_at_us < ?1",
            params![cutoff.timestamp_micros()],
        )?;
        Ok(deleted)
    }
}
