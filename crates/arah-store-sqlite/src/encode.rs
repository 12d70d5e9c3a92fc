//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings. ID lists and the ranked
//! result are stored as compact JSON.

use arah_core::{
  catalog::{InterestId, SkillId},
  consultation::{
    AnswerRecord, Consultation, ConsultationId, RankedCareer, UserId,
  },
};
use chrono::{DateTime, Utc};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── JSON columns ────────────────────────────────────────────────────────────

pub fn encode_interest_ids(ids: &[InterestId]) -> Result<String> {
  Ok(serde_json::to_string(ids)?)
}

pub fn encode_skill_ids(ids: &[SkillId]) -> Result<String> {
  Ok(serde_json::to_string(ids)?)
}

pub fn encode_result(result: &[RankedCareer]) -> Result<String> {
  Ok(serde_json::to_string(result)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `consultations` row.
pub struct RawConsultation {
  pub id:           String,
  pub user_id:      String,
  pub interest_ids: String,
  pub skill_ids:    String,
  pub result:       String,
  pub consulted_at: String,
}

impl RawConsultation {
  pub fn into_consultation(self) -> Result<Consultation> {
    Ok(Consultation {
      id:           ConsultationId(self.id),
      user_id:      UserId(self.user_id),
      interest_ids: serde_json::from_str(&self.interest_ids)?,
      skill_ids:    serde_json::from_str(&self.skill_ids)?,
      result:       serde_json::from_str(&self.result)?,
      consulted_at: decode_dt(&self.consulted_at)?,
    })
  }
}

/// Raw strings read directly from a `consultation_answers` row.
pub struct RawAnswer {
  pub id:              i64,
  pub consultation_id: String,
  pub user_id:         String,
  pub interest_id:     String,
  pub skill_id:        String,
  pub recorded_at:     String,
}

impl RawAnswer {
  pub fn into_answer(self) -> Result<AnswerRecord> {
    Ok(AnswerRecord {
      id:              self.id,
      consultation_id: ConsultationId(self.consultation_id),
      user_id:         UserId(self.user_id),
      interest_id:     InterestId(self.interest_id),
      skill_id:        SkillId(self.skill_id),
      recorded_at:     decode_dt(&self.recorded_at)?,
    })
  }
}
