//! Handlers for `/skills` endpoints. Same shape as `/interests`, with a
//! `description` field in the body.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};

use arah_core::{
  catalog::{NewSkill, Skill, SkillId},
  store::GuidanceStore,
};

use crate::error::ApiError;

/// `GET /skills`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Skill>>, ApiError>
where
  S: GuidanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let skills = store
    .list_skills()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(skills))
}

/// `POST /skills` — body: `{"name":"…","description":"…"}`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewSkill>,
) -> Result<impl IntoResponse, ApiError>
where
  S: GuidanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let skill = store
    .add_skill(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(skill)))
}

/// `GET /skills/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<SkillId>,
) -> Result<Json<Skill>, ApiError>
where
  S: GuidanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let skill = store
    .get_skill(&id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("skill {id} not found")))?;
  Ok(Json(skill))
}

/// `PUT /skills/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<SkillId>,
  Json(body): Json<NewSkill>,
) -> Result<Json<Skill>, ApiError>
where
  S: GuidanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if store
    .get_skill(&id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .is_none()
  {
    return Err(ApiError::NotFound(format!("skill {id} not found")));
  }
  let skill = store
    .update_skill(&id, body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(skill))
}

/// `DELETE /skills/:id`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<SkillId>,
) -> Result<StatusCode, ApiError>
where
  S: GuidanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if store
    .get_skill(&id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .is_none()
  {
    return Err(ApiError::NotFound(format!("skill {id} not found")));
  }
  store
    .delete_skill(&id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(StatusCode::NO_CONTENT)
}
