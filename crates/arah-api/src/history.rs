//! Handler for `/history` — a user's answer history grouped per
//! consultation, optionally bounded by date.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use arah_core::{
  catalog::{InterestId, SkillId},
  consultation::{ConsultationId, UserId},
  store::GuidanceStore,
};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
  pub user_id: UserId,
  #[serde(default)]
  pub from:    Option<DateTime<Utc>>,
  #[serde(default)]
  pub to:      Option<DateTime<Utc>>,
}

/// One selected interest × skill pair within a history entry.
#[derive(Debug, Serialize)]
pub struct HistoryPair {
  pub interest_id: InterestId,
  pub skill_id:    SkillId,
}

/// All answer rows of one consultation, newest consultation first.
#[derive(Debug, Serialize)]
pub struct HistoryEntry {
  pub consultation_id: ConsultationId,
  pub recorded_at:     DateTime<Utc>,
  pub pairs:           Vec<HistoryPair>,
}

/// `GET /history?user_id=…[&from=…][&to=…]`
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError>
where
  S: GuidanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if let (Some(from), Some(to)) = (params.from, params.to)
    && from > to
  {
    return Err(ApiError::BadRequest(
      "`from` must not be later than `to`".into(),
    ));
  }

  let answers = store
    .answers_for_user(&params.user_id, params.from, params.to)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  // The rows arrive newest first; consecutive rows of one consultation
  // collapse into a single entry.
  let mut entries: Vec<HistoryEntry> = Vec::new();
  for answer in answers {
    if entries.last().map(|e| &e.consultation_id)
      != Some(&answer.consultation_id)
    {
      entries.push(HistoryEntry {
        consultation_id: answer.consultation_id.clone(),
        recorded_at:     answer.recorded_at,
        pairs:           Vec::new(),
      });
    }
    let entry = entries.last_mut().expect("just pushed");
    entry.pairs.push(HistoryPair {
      interest_id: answer.interest_id,
      skill_id:    answer.skill_id,
    });
  }
  Ok(Json(entries))
}
