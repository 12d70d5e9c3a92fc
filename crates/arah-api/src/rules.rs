//! Handlers for `/rules` endpoints — the per-career rule base.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/rules` | All rule sets, grouped per career |
//! | `POST`   | `/rules` | Body: the rule-set shape below |
//! | `GET`    | `/rules/:career_id` | Grouped set, 404 if the career has none |
//! | `DELETE` | `/rules/:career_id` | Removes the whole set |
//!
//! POST body:
//! `{"career_id":"KAR01","interest_ids":[…],"skill_ids":[…],"certainty_factor":0.8}`

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Serialize;

use arah_core::{
  catalog::CareerId,
  rule::{CareerRuleSet, NewRuleSet},
  store::GuidanceStore,
};

use crate::error::ApiError;

/// `GET /rules`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<CareerRuleSet>>, ApiError>
where
  S: GuidanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let sets = store
    .list_rule_sets()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(sets))
}

/// `POST /rules`
///
/// Validates the selection shape (400), catalog membership (404), and the
/// one-set-per-career constraint (409) before fanning the set out.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewRuleSet>,
) -> Result<impl IntoResponse, ApiError>
where
  S: GuidanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  body
    .validate()
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

  if store
    .get_career(&body.career_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .is_none()
  {
    return Err(ApiError::NotFound(format!(
      "career {} not found",
      body.career_id
    )));
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
  if store
    .rule_set_for_career(&body.career_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .is_some()
  {
    return Err(ApiError::Conflict(format!(
      "career {} already has a rule set",
      body.career_id
    )));
  }

  let career_id = body.career_id.clone();
  store
    .add_rule_set(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let set = store
    .rule_set_for_career(&career_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| {
      ApiError::NotFound(format!("career {career_id} has no rule set"))
    })?;
  Ok((StatusCode::CREATED, Json(set)))
}

/// `GET /rules/:career_id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(career_id): Path<CareerId>,
) -> Result<Json<CareerRuleSet>, ApiError>
where
  S: GuidanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let set = store
    .rule_set_for_career(&career_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| {
      ApiError::NotFound(format!("career {career_id} has no rule set"))
    })?;
  Ok(Json(set))
}

#[derive(Debug, Serialize)]
pub struct Deleted {
  pub deleted: usize,
}

/// `DELETE /rules/:career_id` — responds with the number of rule rows
/// removed.
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path(career_id): Path<CareerId>,
) -> Result<Json<Deleted>, ApiError>
where
  S: GuidanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let deleted = store
    .delete_rule_set(&career_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if deleted == 0 {
    return Err(ApiError::NotFound(format!(
      "career {career_id} has no rule set"
    )));
  }
  Ok(Json(Deleted { deleted }))
}
