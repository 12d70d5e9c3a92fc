//! Rule types — the weighted associations ("basis aturan") the engine
//! matches against.
//!
//! A rule links one career to one interest × skill pair, optionally
//! weighted by a certainty factor in `[0, 1]`. Absence of a rule means
//! zero support for that combination; the rule set for a career need not
//! cover every pair. Rules are created as a whole set per career and
//! deleted per career, never updated in place, so results computed from
//! historical consultations stay reproducible.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  catalog::{CareerId, Interest, InterestId, Skill, SkillId},
};

// ─── Identifier ──────────────────────────────────────────────────────────────

/// Identifier for a [`Rule`] (`BAS…`).
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RuleId(pub String);

impl RuleId {
  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for RuleId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for RuleId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

// ─── Rule ────────────────────────────────────────────────────────────────────

/// A single weighted association between one career, one interest, and
/// one skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
  pub id:               RuleId,
  pub career_id:        CareerId,
  pub interest_id:      InterestId,
  pub skill_id:         SkillId,
  /// Confidence weight in `[0, 1]`. `None` means the rule matches but
  /// contributes no evidence to the combined score.
  pub certainty_factor: Option<f64>,
}

// ─── NewRuleSet ──────────────────────────────────────────────────────────────

/// Input to [`crate::store::GuidanceStore::add_rule_set`].
///
/// The store fans this out into one [`Rule`] row per interest × skill
/// pair, all sharing `certainty_factor`. A career may hold at most one
/// rule set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRuleSet {
  pub career_id:        CareerId,
  pub interest_ids:     Vec<InterestId>,
  pub skill_ids:        Vec<SkillId>,
  pub certainty_factor: Option<f64>,
}

impl NewRuleSet {
  /// Reject empty selections and out-of-range certainty factors before
  /// anything touches the store.
  pub fn validate(&self) -> Result<()> {
    if self.interest_ids.is_empty() {
      return Err(Error::EmptyInterestSelection);
    }
    if self.skill_ids.is_empty() {
      return Err(Error::EmptySkillSelection);
    }
    if let Some(cf) = self.certainty_factor
      && !(0.0..=1.0).contains(&cf)
    {
      return Err(Error::CertaintyOutOfRange(cf));
    }
    Ok(())
  }
}

// ─── Grouped view ────────────────────────────────────────────────────────────

/// The per-career read model of the rule base: the fan-out rows collapsed
/// back into deduplicated interest and skill lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareerRuleSet {
  pub career_id:        CareerId,
  pub career_name:      String,
  pub certainty_factor: Option<f64>,
  pub interests:        Vec<Interest>,
  pub skills:           Vec<Skill>,
}
