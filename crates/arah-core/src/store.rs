//! The `GuidanceStore` trait — the persistence boundary of the service.
//!
//! The trait is implemented by storage backends (e.g.
//! `arah-store-sqlite`). Higher layers (`arah-api`, `arah-server`)
//! depend on this abstraction, not on any concrete backend. The
//! recommendation engine itself is pure; it consumes snapshots produced
//! by these methods and its output is persisted through
//! [`GuidanceStore::record_consultation`].
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`). Methods that
//! borrow an ID name the lifetime explicitly so implementations written
//! as `async fn` may capture the borrow.

use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;

use chrono::{DateTime, Utc};

use crate::{
  catalog::{
    Career, CareerId, Interest, InterestId, NewCareer, NewInterest, NewSkill,
    Skill, SkillId,
  },
  consultation::{
    AnswerRecord, Consultation, ConsultationId, NewConsultation, UserId,
  },
  rule::{CareerRuleSet, NewRuleSet, Rule},
};

/// Abstraction over an Arah knowledge-base and consultation store.
///
/// Catalog entries are plain CRUD. Rules are written as a per-career set
/// and deleted as a set. Consultations are append-only: one write per
/// user submission, which must also fan the answer history out in the
/// same transaction.
pub trait GuidanceStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Interests ─────────────────────────────────────────────────────────

  /// Create an interest; the store assigns the ID.
  fn add_interest(
    &self,
    input: NewInterest,
  ) -> impl Future<Output = Result<Interest, Self::Error>> + Send + '_;

  /// Retrieve an interest by ID. Returns `None` if not found.
  fn get_interest<'a>(
    &'a self,
    id: &'a InterestId,
  ) -> impl Future<Output = Result<Option<Interest>, Self::Error>> + Send + 'a;

  /// List the whole interest catalog, ID ascending.
  fn list_interests(
    &self,
  ) -> impl Future<Output = Result<Vec<Interest>, Self::Error>> + Send + '_;

  /// Replace an interest's fields. Errors if the ID is unknown.
  fn update_interest<'a>(
    &'a self,
    id: &'a InterestId,
    input: NewInterest,
  ) -> impl Future<Output = Result<Interest, Self::Error>> + Send + 'a;

  /// Delete an interest. Errors if the ID is unknown.
  fn delete_interest<'a>(
    &'a self,
    id: &'a InterestId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Skills ────────────────────────────────────────────────────────────

  fn add_skill(
    &self,
    input: NewSkill,
  ) -> impl Future<Output = Result<Skill, Self::Error>> + Send + '_;

  fn get_skill<'a>(
    &'a self,
    id: &'a SkillId,
  ) -> impl Future<Output = Result<Option<Skill>, Self::Error>> + Send + 'a;

  fn list_skills(
    &self,
  ) -> impl Future<Output = Result<Vec<Skill>, Self::Error>> + Send + '_;

  fn update_skill<'a>(
    &'a self,
    id: &'a SkillId,
    input: NewSkill,
  ) -> impl Future<Output = Result<Skill, Self::Error>> + Send + 'a;

  fn delete_skill<'a>(
    &'a self,
    id: &'a SkillId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Careers ───────────────────────────────────────────────────────────

  fn add_career(
    &self,
    input: NewCareer,
  ) -> impl Future<Output = Result<Career, Self::Error>> + Send + '_;

  fn get_career<'a>(
    &'a self,
    id: &'a CareerId,
  ) -> impl Future<Output = Result<Option<Career>, Self::Error>> + Send + 'a;

  fn list_careers(
    &self,
  ) -> impl Future<Output = Result<Vec<Career>, Self::Error>> + Send + '_;

  fn update_career<'a>(
    &'a self,
    id: &'a CareerId,
    input: NewCareer,
  ) -> impl Future<Output = Result<Career, Self::Error>> + Send + 'a;

  fn delete_career<'a>(
    &'a self,
    id: &'a CareerId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Rule base ─────────────────────────────────────────────────────────

  /// Create the rule set for a career: one [`Rule`] row per
  /// interest × skill pair of `input`.
  ///
  /// Errors if any referenced catalog ID is unknown or if the career
  /// already has a rule set.
  fn add_rule_set(
    &self,
    input: NewRuleSet,
  ) -> impl Future<Output = Result<Vec<Rule>, Self::Error>> + Send + '_;

  /// All rule sets, grouped per career with deduplicated interest and
  /// skill lists.
  fn list_rule_sets(
    &self,
  ) -> impl Future<Output = Result<Vec<CareerRuleSet>, Self::Error>> + Send + '_;

  /// The grouped rule set for one career. Returns `None` if the career
  /// has no rules.
  fn rule_set_for_career<'a>(
    &'a self,
    id: &'a CareerId,
  ) -> impl Future<Output = Result<Option<CareerRuleSet>, Self::Error>> + Send + 'a;

  /// Delete every rule of a career; returns the number of rows removed.
  fn delete_rule_set<'a>(
    &'a self,
    id: &'a CareerId,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  /// All rules whose interest AND skill are in the given selection —
  /// the `allRulesMatching` contract consumed by the engine.
  fn rules_matching<'a>(
    &'a self,
    interests: &'a BTreeSet<InterestId>,
    skills: &'a BTreeSet<SkillId>,
  ) -> impl Future<Output = Result<Vec<Rule>, Self::Error>> + Send + 'a;

  /// Distinct-skill counts per career over the entire rule base — the
  /// `requiredSkillCountForCareer` contract consumed by the engine.
  fn required_skill_counts(
    &self,
  ) -> impl Future<Output = Result<BTreeMap<CareerId, usize>, Self::Error>> + Send + '_;

  // ── Consultations ─────────────────────────────────────────────────────

  /// Persist a consultation and its answer-history fan-out
  /// (`|interests| × |skills|` rows) in a single transaction.
  fn record_consultation(
    &self,
    input: NewConsultation,
  ) -> impl Future<Output = Result<Consultation, Self::Error>> + Send + '_;

  fn get_consultation<'a>(
    &'a self,
    id: &'a ConsultationId,
  ) -> impl Future<Output = Result<Option<Consultation>, Self::Error>> + Send + 'a;

  /// All consultations, newest first.
  fn list_consultations(
    &self,
  ) -> impl Future<Output = Result<Vec<Consultation>, Self::Error>> + Send + '_;

  /// Delete a consultation and, by cascade, its answer records.
  fn delete_consultation<'a>(
    &'a self,
    id: &'a ConsultationId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Answer history ────────────────────────────────────────────────────

  /// The fan-out rows of one consultation.
  fn answers_for_consultation<'a>(
    &'a self,
    id: &'a ConsultationId,
  ) -> impl Future<Output = Result<Vec<AnswerRecord>, Self::Error>> + Send + 'a;

  /// A user's answer rows, newest first, optionally bounded by
  /// `recorded_at`.
  fn answers_for_user<'a>(
    &'a self,
    user_id: &'a UserId,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
  ) -> impl Future<Output = Result<Vec<AnswerRecord>, Self::Error>> + Send + 'a;
}
