//! Handlers for `/consultations` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/consultations` | Newest first |
//! | `POST`   | `/consultations` | Runs the engine, persists, 201 |
//! | `GET`    | `/consultations/:id` | The stored consultation |
//! | `DELETE` | `/consultations/:id` | Cascades to answer history |
//! | `GET`    | `/consultations/:id/result` | All careers, zero-filled |
//! | `GET`    | `/consultations/:id/outcome` | The winning career in full |
//! | `GET`    | `/consultations/:id/answers` | Selected names + timestamp |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use arah_core::{
  catalog::{Career, Interest, InterestId, Skill, SkillId},
  consultation::{
    Consultation, ConsultationId, NewConsultation, RankedCareer, UserId,
  },
  engine::{self, Selection},
  store::GuidanceStore,
};

use crate::error::ApiError;

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub user_id:      UserId,
  pub interest_ids: Vec<InterestId>,
  pub skill_ids:    Vec<SkillId>,
  /// Defaults to the time of the request.
  #[serde(default)]
  pub consulted_at: Option<DateTime<Utc>>,
}

/// `POST /consultations`
///
/// Validates the selection, runs the recommendation engine against the
/// current rule base, resolves career names, and persists the
/// consultation together with its answer-history fan-out.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: GuidanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if body.interest_ids.is_empty() {
    return Err(ApiError::BadRequest("no interests selected".into()));
  }
  if body.skill_ids.is_empty() {
    return Err(ApiError::BadRequest("no skills selected".into()));
  }
  for id in &body.interest_ids {
    if store
      .get_interest(id)
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?
      .is_none()
    {
      return Err(ApiError::NotFound(format!("interest {id} not found")));
    }
  }
  for id in &body.skill_ids {
    if store
      .get_skill(id)
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?
      .is_none()
    {
      return Err(ApiError::NotFound(format!("skill {id} not found")));
    }
  }

  let selection = Selection::new(
    body.interest_ids.iter().cloned(),
    body.skill_ids.iter().cloned(),
  );
  let rules = store
    .rules_matching(&selection.interests, &selection.skills)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let required = store
    .required_skill_counts()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let ranked = engine::recommend(&selection, &rules, &required);

  let mut result = Vec::with_capacity(ranked.len());
  for scored in ranked {
    let career = store
      .get_career(&scored.career_id)
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?
      .ok_or_else(|| {
        ApiError::NotFound(format!("career {} not found", scored.career_id))
      })?;
    result.push(RankedCareer {
      career_id:   scored.career_id,
      career_name: career.name,
      percentage:  scored.percentage,
    });
  }

  let consultation = store
    .record_consultation(NewConsultation {
      user_id:      body.user_id,
      interest_ids: body.interest_ids,
      skill_ids:    body.skill_ids,
      result,
      consulted_at: body.consulted_at,
    })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  tracing::info!(
    consultation = %consultation.id,
    user = %consultation.user_id,
    careers = consultation.result.len(),
    "recorded consultation"
  );
  Ok((StatusCode::CREATED, Json(consultation)))
}

// ─── Read / delete ───────────────────────────────────────────────────────────

/// `GET /consultations`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Consultation>>, ApiError>
where
  S: GuidanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let consultations = store
    .list_consultations()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(consultations))
}

async fn fetch<S>(
  store: &Arc<S>,
  id: &ConsultationId,
) -> Result<Consultation, ApiError>
where
  S: GuidanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .get_consultation(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("consultation {id} not found")))
}

/// `GET /consultations/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<ConsultationId>,
) -> Result<Json<Consultation>, ApiError>
where
  S: GuidanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Ok(Json(fetch(&store, &id).await?))
}

/// `DELETE /consultations/:id`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<ConsultationId>,
) -> Result<StatusCode, ApiError>
where
  S: GuidanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  fetch(&store, &id).await?;
  store
    .delete_consultation(&id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Result view ─────────────────────────────────────────────────────────────

/// `GET /consultations/:id/result`
///
/// The all-careers percentage view: the stored ranking first, then every
/// remaining catalog career zero-filled in ID order.
pub async fn result_view<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<ConsultationId>,
) -> Result<Json<Vec<RankedCareer>>, ApiError>
where
  S: GuidanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let consultation = fetch(&store, &id).await?;
  let careers = store
    .list_careers()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let mut view = consultation.result.clone();
  for career in careers {
    if !view.iter().any(|r| r.career_id == career.id) {
      view.push(RankedCareer {
        career_id:   career.id,
        career_name: career.name,
        percentage:  0,
      });
    }
  }
  Ok(Json(view))
}

// ─── Outcome view ────────────────────────────────────────────────────────────

/// The winning career of a consultation, expanded with its catalog entry
/// and the interests and skills of its rule set.
#[derive(Debug, Serialize)]
pub struct Outcome {
  pub consultation_id: ConsultationId,
  pub career:          Career,
  pub percentage:      u8,
  pub interests:       Vec<Interest>,
  pub skills:          Vec<Skill>,
  pub consulted_at:    DateTime<Utc>,
}

/// `GET /consultations/:id/outcome`
pub async fn outcome_view<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<ConsultationId>,
) -> Result<Json<Outcome>, ApiError>
where
  S: GuidanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let consultation = fetch(&store, &id).await?;
  let top = consultation.result.first().ok_or_else(|| {
    ApiError::NotFound(format!("consultation {id} matched no career"))
  })?;
  let career = store
    .get_career(&top.career_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| {
      ApiError::NotFound(format!("career {} not found", top.career_id))
    })?;
  // The rule set may have been deleted since the consultation was
  // recorded; the outcome then carries empty lists.
  let (interests, skills) = match store
    .rule_set_for_career(&top.career_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
  {
    Some(set) => (set.interests, set.skills),
    None => (Vec::new(), Vec::new()),
  };

  Ok(Json(Outcome {
    consultation_id: consultation.id,
    career,
    percentage: top.percentage,
    interests,
    skills,
    consulted_at: consultation.consulted_at,
  }))
}

// ─── Answers view ────────────────────────────────────────────────────────────

/// The selections of one consultation, resolved to names.
#[derive(Debug, Serialize)]
pub struct Answers {
  pub consultation_id: ConsultationId,
  pub user_id:         UserId,
  pub interests:       Vec<String>,
  pub skills:          Vec<String>,
  pub consulted_at:    DateTime<Utc>,
}

/// `GET /consultations/:id/answers`
///
/// Names are resolved against the current catalog; a selection whose
/// catalog entry was deleted falls back to the raw ID.
pub async fn answers_view<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<ConsultationId>,
) -> Result<Json<Answers>, ApiError>
where
  S: GuidanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let consultation = fetch(&store, &id).await?;

  let mut interests = Vec::with_capacity(consultation.interest_ids.len());
  for interest_id in &consultation.interest_ids {
    let name = store
      .get_interest(interest_id)
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?
      .map(|i| i.name)
      .unwrap_or_else(|| interest_id.as_str().to_owned());
    if !interests.contains(&name) {
      interests.push(name);
    }
  }
  let mut skills = Vec::with_capacity(consultation.skill_ids.len());
  for skill_id in &consultation.skill_ids {
    let name = store
      .get_skill(skill_id)
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?
      .map(|s| s.name)
      .unwrap_or_else(|| skill_id.as_str().to_owned());
    if !skills.contains(&name) {
      skills.push(name);
    }
  }

  Ok(Json(Answers {
    consultation_id: consultation.id,
    user_id: consultation.user_id,
    interests,
    skills,
    consulted_at: consultation.consulted_at,
  }))
}
