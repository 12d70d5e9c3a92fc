//! Handlers for `/careers` endpoints. Same shape as `/interests`, with
//! `description` and optional `development_notes` in the body.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};

use arah_core::{
  catalog::{Career, CareerId, NewCareer},
  store::GuidanceStore,
};

use crate::error::ApiError;

/// `GET /careers`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Career>>, ApiError>
where
  S: GuidanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let careers = store
    .list_careers()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(careers))
}

/// `POST /careers`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewCareer>,
) -> Result<impl IntoResponse, ApiError>
where
  S: GuidanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let career = store
    .add_career(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(career)))
}

/// `GET /careers/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<CareerId>,
) -> Result<Json<Career>, ApiError>
where
  S: GuidanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let career = store
    .get_career(&id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("career {id} not found")))?;
  Ok(Json(career))
}

/// `PUT /careers/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<CareerId>,
  Json(body): Json<NewCareer>,
) -> Result<Json<Career>, ApiError>
where
  S: GuidanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if store
    .get_career(&id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .is_none()
  {
    return Err(ApiError::NotFound(format!("career {id} not found")));
  }
  let career = store
    .update_career(&id, body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(career))
}

/// `DELETE /careers/:id`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<CareerId>,
) -> Result<StatusCode, ApiError>
where
  S: GuidanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if store
    .get_career(&id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .is_none()
  {
    return Err(ApiError::NotFound(format!("career {id} not found")));
  }
  store
    .delete_career(&id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(StatusCode::NO_CONTENT)
}
