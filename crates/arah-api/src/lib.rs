//! JSON REST API for Arah.
//!
//! Exposes an axum [`Router`] backed by any
//! [`arah_core::store::GuidanceStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", arah_api::api_router(store.clone()))
//! ```

pub mod careers;
pub mod consultations;
pub mod error;
pub mod history;
pub mod interests;
pub mod rules;
pub mod skills;

use std::sync::Arc;

use axum::{Router, routing::get};

use arah_core::store::GuidanceStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: GuidanceStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Catalogs
    .route(
      "/interests",
      get(interests::list::<S>).post(interests::create::<S>),
    )
    .route(
      "/interests/{id}",
      get(interests::get_one::<S>)
        .put(interests::update::<S>)
        .delete(interests::delete::<S>),
    )
    .route("/skills", get(skills::list::<S>).post(skills::create::<S>))
    .route(
      "/skills/{id}",
      get(skills::get_one::<S>)
        .put(skills::update::<S>)
        .delete(skills::delete::<S>),
    )
    .route("/careers", get(careers::list::<S>).post(careers::create::<S>))
    .route(
      "/careers/{id}",
      get(careers::get_one::<S>)
        .put(careers::update::<S>)
        .delete(careers::delete::<S>),
    )
    // Rule base
    .route("/rules", get(rules::list::<S>).post(rules::create::<S>))
    .route(
      "/rules/{career_id}",
      get(rules::get_one::<S>).delete(rules::delete::<S>),
    )
    // Consultations
    .route(
      "/consultations",
      get(consultations::list::<S>).post(consultations::create::<S>),
    )
    .route(
      "/consultations/{id}",
      get(consultations::get_one::<S>).delete(consultations::delete::<S>),
    )
    .route(
      "/consultations/{id}/result",
      get(consultations::result_view::<S>),
    )
    .route(
      "/consultations/{id}/outcome",
      get(consultations::outcome_view::<S>),
    )
    .route(
      "/consultations/{id}/answers",
      get(consultations::answers_view::<S>),
    )
    // History
    .route("/history", get(history::handler::<S>))
    .with_state(store)
}
