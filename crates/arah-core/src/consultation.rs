//! Consultation types — one user's recommendation request and its stored
//! outcome, plus the per-pair answer-history records.
//!
//! A consultation is created exactly once per submission and never
//! mutated; the ranked result is computed synchronously at creation time
//! and stored with it.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{CareerId, InterestId, SkillId};

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// Identifier for a [`Consultation`] (`KON…`).
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ConsultationId(pub String);

impl ConsultationId {
  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for ConsultationId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for ConsultationId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

/// Opaque identifier for the consulting user. Accounts and sessions are
/// owned by an external collaborator; this crate never interprets it.
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for UserId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for UserId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

// ─── Result entries ──────────────────────────────────────────────────────────

/// One entry of a stored consultation result: a career with its
/// normalised match percentage, name resolved at computation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCareer {
  pub career_id:   CareerId,
  pub career_name: String,
  /// Integer percentage in `0..=100`.
  pub percentage:  u8,
}

// ─── Consultation ────────────────────────────────────────────────────────────

/// One user's recommendation request together with its computed result.
/// Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Consultation {
  pub id:           ConsultationId,
  pub user_id:      UserId,
  pub interest_ids: Vec<InterestId>,
  pub skill_ids:    Vec<SkillId>,
  /// Ranked result, sorted descending by percentage. Empty when the
  /// selection matched no rule at all.
  pub result:       Vec<RankedCareer>,
  pub consulted_at: DateTime<Utc>,
}

/// Input to [`crate::store::GuidanceStore::record_consultation`].
/// The ID is assigned by the store; `consulted_at` defaults to now.
#[derive(Debug, Clone)]
pub struct NewConsultation {
  pub user_id:      UserId,
  pub interest_ids: Vec<InterestId>,
  pub skill_ids:    Vec<SkillId>,
  pub result:       Vec<RankedCareer>,
  pub consulted_at: Option<DateTime<Utc>>,
}

// ─── Answer history ──────────────────────────────────────────────────────────

/// One interest × skill pair selected in a consultation.
///
/// The store writes `|interests| × |skills|` of these per consultation —
/// a deliberate denormalisation kept for compatibility with the
/// aggregate-by-date and aggregate-by-user history queries. Never
/// mutated; deleted only when the owning consultation is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRecord {
  pub id:              i64,
  pub consultation_id: ConsultationId,
  pub user_id:         UserId,
  pub interest_id:     InterestId,
  pub skill_id:        SkillId,
  pub recorded_at:     DateTime<Utc>,
}
