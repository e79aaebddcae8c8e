//! Deterministic risk aggregation.
//!
//! Combines the verification producers' outputs (document forensics,
//! face match, GPS agreement, phone verification) into a bounded score
//! and a discrete risk level. The formula is a fixed weighted sum over
//! an explainable baseline — no black-box ensemble — so every decision
//! is reproducible for compliance review.
//!
//! A missing signal contributes zero: absence is scored as the worst
//! case for that signal, not excluded from the denominator. This is
//! policy, not an accident.

use serde::{Deserialize, Serialize};
use verity_types::{RiskLevel, Session};

/// Weight of the document authenticity signal.
pub const WEIGHT_DOCUMENT: f64 = 0.25;
/// Weight of the face match signal.
pub const WEIGHT_FACE_MATCH: f64 = 0.25;
/// Weight of the GPS agreement signal.
pub const WEIGHT_GPS: f64 = 0.20;
/// Weight of the phone verification signal.
pub const WEIGHT_PHONE: f64 = 0.15;
/// Points every submission starts from.
pub const BASELINE: f64 = 15.0;

/// Score at or above which the risk level is green.
pub const GREEN_THRESHOLD: u8 = 85;
/// Score at or above which the risk level is amber (below green).
pub const AMBER_THRESHOLD: u8 = 60;

/// The verification signals consumed by the aggregator.
///
/// Each present signal is a confidence in [0, 1]; values outside that
/// range are clamped. This struct is the entire contract with the
/// signal producers — how a confidence was computed is out of scope.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct RiskSignals {
    pub document_authenticity: Option<f64>,
    pub face_match_score: Option<f64>,
    pub gps_match: Option<f64>,
    pub phone_verification: Option<f64>,
}

impl RiskSignals {
    /// Whether any signal is present at all. When nothing is present
    /// the workflow leaves the risk fields unset for manual review
    /// rather than storing the bare baseline.
    pub fn any_present(&self) -> bool {
        self.document_authenticity.is_some()
            || self.face_match_score.is_some()
            || self.gps_match.is_some()
            || self.phone_verification.is_some()
    }

    /// Extract signals from a session's step payloads.
    pub fn from_session(session: &Session) -> Self {
        Self {
            document_authenticity: session.document.as_ref().and_then(|d| d.authenticity),
            face_match_score: session.biometric.as_ref().and_then(|b| b.face_match_score),
            gps_match: session.geolocation.as_ref().and_then(|g| g.gps_match),
            phone_verification: session
                .phone_verification
                .as_ref()
                .map(|p| if p.verified { 1.0 } else { 0.0 }),
        }
    }
}

/// A computed risk decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Always in [0, 100].
    pub score: u8,
    pub level: RiskLevel,
}

fn clamp_unit(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

/// Aggregate the signals into a score and level.
pub fn score(signals: &RiskSignals) -> RiskAssessment {
    let weighted = signals.document_authenticity.map_or(0.0, clamp_unit) * WEIGHT_DOCUMENT
        + signals.face_match_score.map_or(0.0, clamp_unit) * WEIGHT_FACE_MATCH
        + signals.gps_match.map_or(0.0, clamp_unit) * WEIGHT_GPS
        + signals.phone_verification.map_or(0.0, clamp_unit) * WEIGHT_PHONE;

    let raw = BASELINE + weighted * 100.0;
    let score = raw.clamp(0.0, 100.0) as u8;
    RiskAssessment {
        score,
        level: level_for(score),
    }
}

/// Discretize a score into its risk band.
pub fn level_for(score: u8) -> RiskLevel {
    if score >= GREEN_THRESHOLD {
        RiskLevel::Green
    } else if score >= AMBER_THRESHOLD {
        RiskLevel::Amber
    } else {
        RiskLevel::Red
    }
}
