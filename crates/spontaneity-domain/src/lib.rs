//! Spontaneity Domain Layer
//!
//! Value types and pure decision rules shared by every other crate.
//! Nothing in here performs I/O; infrastructure implementations live in
//! other crates and plug in through [`traits`].
//!
//! ## Key Concepts
//!
//! - **Trust signals**: four independent booleans describing where a recommendation came from
//! - **Trust badge**: single label resolved from the signals by a fixed priority order
//! - **Confidence level**: weighted score over the signals, bucketed into low/medium/high
//! - **Trust policy**: partner thresholds a recommendation must satisfy before it is surfaced
//! - **Audit log event**: PII-free record of every recommendation decision

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod audit;
pub mod badge;
pub mod confidence;
pub mod context;
pub mod metadata;
pub mod policy;
pub mod signals;
pub mod traits;
pub mod why_now;

// Re-exports for convenience
pub use audit::{AuditLogEvent, AuditQuery, DEFAULT_AUDIT_LIMIT, MAX_AUDIT_LIMIT};
pub use badge::{resolve_trust_badge, TrustBadge};
pub use confidence::{compute_confidence_level, confidence_score, ConfidenceLevel};
pub use context::UserContext;
pub use metadata::TrustMetadata;
pub use policy::TrustPolicy;
pub use signals::TrustSignals;
pub use why_now::generate_why_now;
