//! Trust metadata derived from signals

use crate::{compute_confidence_level, resolve_trust_badge, ConfidenceLevel, TrustBadge, TrustSignals};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Trust information attached to a recommendation
///
/// Immutable once built. Badge and confidence are derived from the signals
/// at construction, so they can never disagree with them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrustMetadata {
    badge: TrustBadge,
    signals: TrustSignals,
    confidence_level: ConfidenceLevel,
    generated_at: DateTime<Utc>,
}

impl TrustMetadata {
    /// Derive metadata from signals, stamped with the current time
    pub fn from_signals(signals: TrustSignals) -> Self {
        Self::from_signals_at(signals, Utc::now())
    }

    /// Derive metadata from signals with an explicit timestamp
    pub fn from_signals_at(signals: TrustSignals, generated_at: DateTime<Utc>) -> Self {
        Self {
            badge: resolve_trust_badge(&signals),
            signals,
            confidence_level: compute_confidence_level(&signals),
            generated_at,
        }
    }

    /// Resolved badge
    pub fn badge(&self) -> TrustBadge {
        self.badge
    }

    /// Signals the metadata was derived from
    pub fn signals(&self) -> &TrustSignals {
        &self.signals
    }

    /// Bucketed confidence
    pub fn confidence_level(&self) -> ConfidenceLevel {
        self.confidence_level
    }

    /// When the metadata was generated
    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }
}
