//! Error types for `arah-core`.

use thiserror::Error;

use crate::catalog::{CareerId, InterestId, SkillId};
use crate::consultation::ConsultationId;

#[derive(Debug, Error)]
pub enum Error {
  #[error("interest not found: {0}")]
  InterestNotFound(InterestId),

  #[error("skill not found: {0}")]
  SkillNotFound(SkillId),

  #[error("career not found: {0}")]
  CareerNotFound(CareerId),

  #[error("consultation not found: {0}")]
  ConsultationNotFound(ConsultationId),

  #[error("career {0} already has a rule set")]
  RuleSetExists(CareerId),

  #[error("at least one interest must be selected")]
  EmptyInterestSelection,

  #[error("at least one skill must be selected")]
  EmptySkillSelection,

  #[error("certainty factor {0} is outside [0, 1]")]
  CertaintyOutOfRange(f64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
