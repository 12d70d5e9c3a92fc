//! Handlers for `/interests` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/interests` | Whole catalog, ID ascending |
//! | `POST`   | `/interests` | Body: `{"name":"…"}` |
//! | `GET`    | `/interests/:id` | 404 if not found |
//! | `PUT`    | `/interests/:id` | Full replacement |
//! | `DELETE` | `/interests/:id` | |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};

use arah_core::{
  catalog::{Interest, InterestId, NewInterest},
  store::GuidanceStore,
};

use crate::error::ApiError;

/// `GET /interests`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Interest>>, ApiError>
where
  S: GuidanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let interests = store
    .list_interests()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(interests))
}

/// `POST /interests` — body: `{"name":"…"}`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewInterest>,
) -> Result<impl IntoResponse, ApiError>
where
  S: GuidanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let interest = store
    .add_interest(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(interest)))
}

/// `GET /interests/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<InterestId>,
) -> Result<Json<Interest>, ApiError>
where
  S: GuidanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let interest = store
    .get_interest(&id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("interest {id} not found")))?;
  Ok(Json(interest))
}

/// `PUT /interests/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<InterestId>,
  Json(body): Json<NewInterest>,
) -> Result<Json<Interest>, ApiError>
where
  S: GuidanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if store
    .get_interest(&id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .is_none()
  {
    return Err(ApiError::NotFound(format!("interest {id} not found")));
  }
  let interest = store
    .update_interest(&id, body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(interest))
}

/// `DELETE /interests/:id`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<InterestId>,
) -> Result<StatusCode, ApiError>
where
  S: GuidanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if store
    .get_interest(&id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .is_none()
  {
    return Err(ApiError::NotFound(format!("interest {id} not found")));
  }
  store
    .delete_interest(&id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(StatusCode::NO_CONTENT)
}
