//! The recommendation engine — a pure scoring function over the rule
//! base.
//!
//! Certainty factors of the rules matching a selection are combined per
//! career, penalised by how much of the career's documented skill
//! requirement the selection actually covers, then normalised into
//! integer percentages. The function owns no state and performs no I/O;
//! the caller supplies a snapshot of the rule base and the per-career
//! required-skill counts.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{
  catalog::{CareerId, InterestId, SkillId},
  rule::Rule,
};

// ─── Selection ───────────────────────────────────────────────────────────────

/// The interests and skills a user selected for one consultation.
#[derive(Debug, Clone, Default)]
pub struct Selection {
  pub interests: BTreeSet<InterestId>,
  pub skills:    BTreeSet<SkillId>,
}

impl Selection {
  pub fn new(
    interests: impl IntoIterator<Item = InterestId>,
    skills: impl IntoIterator<Item = SkillId>,
  ) -> Self {
    Self {
      interests: interests.into_iter().collect(),
      skills:    skills.into_iter().collect(),
    }
  }

  /// A selection is unusable when either side is empty.
  pub fn is_empty(&self) -> bool {
    self.interests.is_empty() || self.skills.is_empty()
  }

  /// Whether `rule` is satisfied by this selection.
  pub fn matches(&self, rule: &Rule) -> bool {
    self.interests.contains(&rule.interest_id)
      && self.skills.contains(&rule.skill_id)
  }
}

// ─── Output ──────────────────────────────────────────────────────────────────

/// One entry of the ranked engine output. Career names are resolved by
/// the caller; the engine only knows IDs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredCareer {
  pub career_id:  CareerId,
  /// Integer percentage in `0..=100`.
  pub percentage: u8,
}

// ─── Certainty-factor combination ────────────────────────────────────────────

/// Standard certainty-factor combination for two non-negative factors:
/// `cf + evidence · (1 − cf)`.
pub fn combine(cf: f64, evidence: f64) -> f64 { cf + evidence * (1.0 - cf) }

#[derive(Default)]
struct CareerEvidence {
  /// Left-fold of [`combine`] over the contributing rules, seeded at 0.
  combined:     f64,
  /// Count of matching rules that carried a certainty factor.
  contributing: usize,
}

// ─── Engine ──────────────────────────────────────────────────────────────────

/// Compute the ranked career recommendation for `selection`.
///
/// `rules` may be the full rule base or a pre-filtered subset; matching
/// is re-checked here either way. `required_skills` maps each career to
/// its count of distinct skills across the *entire* rule base.
///
/// Never fails: an empty selection or an empty rule base produces an
/// empty result, and a selection whose matches carry no evidence
/// produces all-zero percentages. Output is sorted descending by
/// percentage with ties kept in career-ID order.
pub fn recommend(
  selection: &Selection,
  rules: &[Rule],
  required_skills: &BTreeMap<CareerId, usize>,
) -> Vec<ScoredCareer> {
  if selection.is_empty() {
    return Vec::new();
  }

  // Group matching rules by career, combining certainty factors left to
  // right. A career enters the group even if all its matching rules are
  // unweighted, so it still shows up at 0%.
  let mut grouped: BTreeMap<CareerId, CareerEvidence> = BTreeMap::new();
  for rule in rules.iter().filter(|r| selection.matches(r)) {
    let evidence = grouped.entry(rule.career_id.clone()).or_default();
    if let Some(cf) = rule.certainty_factor {
      evidence.combined = combine(evidence.combined, cf);
      evidence.contributing += 1;
    }
  }

  // Penalise careers whose documented skill requirement is only
  // partially covered. A career with no required skills on record
  // contributes nothing rather than dividing by zero.
  let mut total = 0.0;
  let adjusted: Vec<(CareerId, f64)> = grouped
    .into_iter()
    .map(|(career_id, evidence)| {
      let required = required_skills.get(&career_id).copied().unwrap_or(0);
      let ratio = if required == 0 {
        0.0
      } else {
        evidence.contributing as f64 / required as f64
      };
      let score = evidence.combined * ratio;
      total += score;
      (career_id, score)
    })
    .collect();

  let mut ranked: Vec<ScoredCareer> = adjusted
    .into_iter()
    .map(|(career_id, score)| {
      let percentage = if total > 0.0 {
        (score / total * 100.0).ceil() as u8
      } else {
        0
      };
      ScoredCareer { career_id, percentage }
    })
    .collect();

  // Stable sort: equal percentages keep the career-ID-ascending order
  // established by the grouping map.
  ranked.sort_by(|a, b| b.percentage.cmp(&a.percentage));
  ranked
}

/// The single winning entry: maximum percentage, first in the stable
/// order on ties.
pub fn winner(ranked: &[ScoredCareer]) -> Option<&ScoredCareer> {
  ranked.first()
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use crate::rule::RuleId;

  fn rule(
    id: u32,
    career: &str,
    interest: &str,
    skill: &str,
    cf: Option<f64>,
  ) -> Rule {
    Rule {
      id:               RuleId(format!("BAS{id}")),
      career_id:        career.into(),
      interest_id:      interest.into(),
      skill_id:         skill.into(),
      certainty_factor: cf,
    }
  }

  fn selection(interests: &[&str], skills: &[&str]) -> Selection {
    Selection::new(
      interests.iter().map(|s| InterestId::from(*s)),
      skills.iter().map(|s| SkillId::from(*s)),
    )
  }

  fn counts(entries: &[(&str, usize)]) -> BTreeMap<CareerId, usize> {
    entries
      .iter()
      .map(|(career, n)| (CareerId::from(*career), *n))
      .collect()
  }

  #[test]
  fn combine_is_the_standard_left_fold() {
    // combine(combine(0, 0.6), 0.5) = 0.6 + 0.5·(1 − 0.6) = 0.8
    let folded = combine(combine(0.0, 0.6), 0.5);
    assert!((folded - 0.8).abs() < 1e-12);
  }

  #[test]
  fn single_full_match_scores_one_hundred_percent() {
    let rules = [rule(1, "KAR1", "MIN1", "KEA1", Some(0.8))];
    let ranked = recommend(
      &selection(&["MIN1"], &["KEA1"]),
      &rules,
      &counts(&[("KAR1", 1)]),
    );
    assert_eq!(ranked, vec![ScoredCareer {
      career_id:  "KAR1".into(),
      percentage: 100,
    }]);
  }

  #[test]
  fn two_careers_normalise_with_ceiling() {
    let rules = [
      rule(1, "KAR1", "MIN1", "KEA1", Some(0.8)),
      rule(2, "KAR2", "MIN1", "KEA2", Some(0.4)),
    ];
    let ranked = recommend(
      &selection(&["MIN1"], &["KEA1", "KEA2"]),
      &rules,
      &counts(&[("KAR1", 1), ("KAR2", 1)]),
    );
    // ceil(0.8/1.2·100) = 67, ceil(0.4/1.2·100) = 34
    assert_eq!(ranked, vec![
      ScoredCareer { career_id: "KAR1".into(), percentage: 67 },
      ScoredCareer { career_id: "KAR2".into(), percentage: 34 },
    ]);
  }

  #[test]
  fn no_matching_rules_yields_empty_result() {
    let rules = [rule(1, "KAR1", "MIN1", "KEA1", Some(0.8))];
    let ranked = recommend(
      &selection(&["MIN9"], &["KEA9"]),
      &rules,
      &counts(&[("KAR1", 1)]),
    );
    assert!(ranked.is_empty());
  }

  #[test]
  fn empty_selection_yields_empty_result() {
    let rules = [rule(1, "KAR1", "MIN1", "KEA1", Some(0.8))];
    let ranked = recommend(
      &selection(&["MIN1"], &[]),
      &rules,
      &counts(&[("KAR1", 1)]),
    );
    assert!(ranked.is_empty());
  }

  #[test]
  fn unweighted_rules_match_at_zero_percent() {
    // All matching rules carry no certainty factor: the career is still
    // listed, at 0%, and nothing errors.
    let rules = [
      rule(1, "KAR1", "MIN1", "KEA1", None),
      rule(2, "KAR1", "MIN1", "KEA2", None),
    ];
    let ranked = recommend(
      &selection(&["MIN1"], &["KEA1", "KEA2"]),
      &rules,
      &counts(&[("KAR1", 2)]),
    );
    assert_eq!(ranked, vec![ScoredCareer {
      career_id:  "KAR1".into(),
      percentage: 0,
    }]);
  }

  #[test]
  fn skill_ratio_penalises_partial_coverage() {
    // KAR1 documents 4 skills but only 1 is matched: its combined CF is
    // scaled by 0.25 relative to KAR2's full match.
    let rules = [
      rule(1, "KAR1", "MIN1", "KEA1", Some(0.8)),
      rule(2, "KAR2", "MIN1", "KEA2", Some(0.8)),
    ];
    let ranked = recommend(
      &selection(&["MIN1"], &["KEA1", "KEA2"]),
      &rules,
      &counts(&[("KAR1", 4), ("KAR2", 1)]),
    );
    // adjusted: KAR1 = 0.8·0.25 = 0.2, KAR2 = 0.8·1 = 0.8
    assert_eq!(ranked, vec![
      ScoredCareer { career_id: "KAR2".into(), percentage: 80 },
      ScoredCareer { career_id: "KAR1".into(), percentage: 20 },
    ]);
  }

  #[test]
  fn zero_required_skills_excludes_career_from_scoring() {
    // KAR1 has matching rules but no required-skill count on record:
    // ratio is substituted with 0 instead of dividing by zero.
    let rules = [
      rule(1, "KAR1", "MIN1", "KEA1", Some(0.9)),
      rule(2, "KAR2", "MIN1", "KEA1", Some(0.5)),
    ];
    let ranked = recommend(
      &selection(&["MIN1"], &["KEA1"]),
      &rules,
      &counts(&[("KAR1", 0), ("KAR2", 1)]),
    );
    assert_eq!(ranked, vec![
      ScoredCareer { career_id: "KAR2".into(), percentage: 100 },
      ScoredCareer { career_id: "KAR1".into(), percentage: 0 },
    ]);
  }

  #[test]
  fn percentages_sum_close_to_one_hundred() {
    let rules = [
      rule(1, "KAR1", "MIN1", "KEA1", Some(0.7)),
      rule(2, "KAR2", "MIN1", "KEA2", Some(0.5)),
      rule(3, "KAR3", "MIN2", "KEA3", Some(0.3)),
    ];
    let ranked = recommend(
      &selection(&["MIN1", "MIN2"], &["KEA1", "KEA2", "KEA3"]),
      &rules,
      &counts(&[("KAR1", 1), ("KAR2", 1), ("KAR3", 1)]),
    );
    let sum: u32 = ranked.iter().map(|r| u32::from(r.percentage)).sum();
    // Ceiling rounds each entry up, so the sum may overshoot slightly.
    assert!((99..=102).contains(&sum), "sum = {sum}");
    assert!(ranked.iter().all(|r| r.percentage <= 100));
  }

  #[test]
  fn identical_inputs_produce_identical_output() {
    let rules = [
      rule(1, "KAR2", "MIN1", "KEA1", Some(0.6)),
      rule(2, "KAR1", "MIN1", "KEA2", Some(0.6)),
      rule(3, "KAR3", "MIN2", "KEA1", Some(0.2)),
    ];
    let sel = selection(&["MIN1", "MIN2"], &["KEA1", "KEA2"]);
    let required = counts(&[("KAR1", 1), ("KAR2", 1), ("KAR3", 2)]);
    let first = recommend(&sel, &rules, &required);
    let second = recommend(&sel, &rules, &required);
    assert_eq!(first, second);
  }

  #[test]
  fn ties_keep_career_id_order() {
    let rules = [
      rule(1, "KAR2", "MIN1", "KEA1", Some(0.5)),
      rule(2, "KAR1", "MIN1", "KEA2", Some(0.5)),
    ];
    let ranked = recommend(
      &selection(&["MIN1"], &["KEA1", "KEA2"]),
      &rules,
      &counts(&[("KAR1", 1), ("KAR2", 1)]),
    );
    assert_eq!(ranked[0].percentage, ranked[1].percentage);
    assert_eq!(ranked[0].career_id, "KAR1".into());
    assert_eq!(ranked[1].career_id, "KAR2".into());
  }

  #[test]
  fn prefiltering_is_not_assumed() {
    // A rule outside the selection must not contribute even though it is
    // present in the slice handed to the engine.
    let rules = [
      rule(1, "KAR1", "MIN1", "KEA1", Some(0.8)),
      rule(2, "KAR1", "MIN2", "KEA2", Some(0.9)),
    ];
    let ranked = recommend(
      &selection(&["MIN1"], &["KEA1"]),
      &rules,
      &counts(&[("KAR1", 2)]),
    );
    // Only the first rule matches: combined = 0.8, ratio = 1/2.
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].percentage, 100);
  }

  #[test]
  fn winner_is_first_of_stable_order() {
    let ranked = vec![
      ScoredCareer { career_id: "KAR1".into(), percentage: 60 },
      ScoredCareer { career_id: "KAR2".into(), percentage: 60 },
    ];
    assert_eq!(winner(&ranked).unwrap().career_id, "KAR1".into());
    assert!(winner(&[]).is_none());
  }
}
