//! Catalog entities — the static knowledge-base entries an administrator
//! maintains: interests ("minat"), skills ("keahlian"), and careers
//! ("karir"). Rules and consultations reference them by ID.
//!
//! IDs are short prefixed sequential strings assigned by the store
//! (`MIN01`, `KEA01`, `KAR01`, …); the core treats them as opaque.

use std::fmt;

use serde::{Deserialize, Serialize};

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// Identifier for an [`Interest`] (`MIN…`).
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct InterestId(pub String);

impl InterestId {
  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for InterestId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for InterestId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

/// Identifier for a [`Skill`] (`KEA…`).
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SkillId(pub String);

impl SkillId {
  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for SkillId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for SkillId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

/// Identifier for a [`Career`] (`KAR…`).
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CareerId(pub String);

impl CareerId {
  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for CareerId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for CareerId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

// ─── Interest ────────────────────────────────────────────────────────────────

/// A catalog tag representing an area of interest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interest {
  pub id:   InterestId,
  pub name: String,
}

/// Input to [`crate::store::GuidanceStore::add_interest`].
/// The ID is always assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInterest {
  pub name: String,
}

// ─── Skill ───────────────────────────────────────────────────────────────────

/// A catalog tag representing a competency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
  pub id:          SkillId,
  pub name:        String,
  pub description: String,
}

/// Input to [`crate::store::GuidanceStore::add_skill`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSkill {
  pub name:        String,
  pub description: String,
}

// ─── Career ──────────────────────────────────────────────────────────────────

/// A recommendable outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Career {
  pub id:                CareerId,
  pub name:              String,
  pub description:       String,
  /// Free-text notes on how to grow into the career, if the
  /// administrator provided any.
  pub development_notes: Option<String>,
}

/// Input to [`crate::store::GuidanceStore::add_career`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCareer {
  pub name:              String,
  pub description:       String,
  pub development_notes: Option<String>,
}
