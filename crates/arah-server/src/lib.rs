//! HTTP server assembly for Arah.
//!
//! Glues the JSON API from `arah-api` onto a concrete store, adds request
//! tracing, and owns the runtime configuration shape. The binary in
//! `main.rs` loads the config and serves the router.

use std::{path::PathBuf, sync::Arc};

use axum::Router;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use arah_core::store::GuidanceStore;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` with
/// `ARAH_*` environment overrides.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 7700 }
fn default_store_path() -> PathBuf { PathBuf::from("arah.db") }

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the full application router: the JSON API under `/api` with
/// request tracing.
pub fn router<S>(store: Arc<S>) -> Router
where
  S: GuidanceStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .nest("/api", arah_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use arah_store_sqlite::SqliteStore;

  async fn app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    router(Arc::new(store))
  }

  async fn send(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(json) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(json.to_string())
      }
      None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
  }

  async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  /// POST a resource and return its assigned ID.
  async fn create(app: &Router, uri: &str, body: Value) -> String {
    let resp = send(app.clone(), "POST", uri, Some(body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED, "POST {uri}");
    json_body(resp).await["id"].as_str().unwrap().to_string()
  }

  // ── Catalog CRUD over HTTP ──────────────────────────────────────────────

  #[tokio::test]
  async fn interest_crud_over_http() {
    let app = app().await;

    let id =
      create(&app, "/api/interests", json!({"name": "Menggambar"})).await;
    assert_eq!(id, "MIN01");

    let resp = send(app.clone(), "GET", "/api/interests", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let list = json_body(resp).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let resp = send(
      app.clone(),
      "PUT",
      "/api/interests/MIN01",
      Some(json!({"name": "Menggambar digital"})),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["name"], "Menggambar digital");

    let resp =
      send(app.clone(), "DELETE", "/api/interests/MIN01", None).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = send(app, "GET", "/api/interests/MIN01", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn unknown_ids_return_404_with_error_body() {
    let app = app().await;

    let resp = send(app.clone(), "GET", "/api/skills/KEA99", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = json_body(resp).await;
    assert!(body["error"].as_str().unwrap().contains("KEA99"));

    let resp = send(app, "DELETE", "/api/careers/KAR99", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── Rule base over HTTP ─────────────────────────────────────────────────

  /// Seed one career with a catalog and rule set; returns the career ID.
  async fn seed_career(
    app: &Router,
    name: &str,
    interest_ids: &[&str],
    skill_ids: &[&str],
    cf: f64,
  ) -> String {
    let career_id = create(
      app,
      "/api/careers",
      json!({
        "name":              name,
        "description":       format!("{name} description"),
        "development_notes": null,
      }),
    )
    .await;
    let resp = send(
      app.clone(),
      "POST",
      "/api/rules",
      Some(json!({
        "career_id":        career_id,
        "interest_ids":     interest_ids,
        "skill_ids":        skill_ids,
        "certainty_factor": cf,
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    career_id
  }

  #[tokio::test]
  async fn rule_set_conflicts_and_validation() {
    let app = app().await;
    create(&app, "/api/interests", json!({"name": "i"})).await;
    create(
      &app,
      "/api/skills",
      json!({"name": "s", "description": "d"}),
    )
    .await;
    let career_id =
      seed_career(&app, "Animator", &["MIN01"], &["KEA01"], 0.8).await;

    // A second set for the same career conflicts.
    let resp = send(
      app.clone(),
      "POST",
      "/api/rules",
      Some(json!({
        "career_id":        career_id,
        "interest_ids":     ["MIN01"],
        "skill_ids":        ["KEA01"],
        "certainty_factor": 0.5,
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Empty selections are rejected before touching the store.
    let resp = send(
      app.clone(),
      "POST",
      "/api/rules",
      Some(json!({
        "career_id":        career_id,
        "interest_ids":     [],
        "skill_ids":        ["KEA01"],
        "certainty_factor": 0.5,
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Out-of-range certainty factor.
    let resp = send(
      app.clone(),
      "POST",
      "/api/rules",
      Some(json!({
        "career_id":        career_id,
        "interest_ids":     ["MIN01"],
        "skill_ids":        ["KEA01"],
        "certainty_factor": 1.5,
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Deleting the set reports the row count; a second delete is a 404.
    let resp = send(
      app.clone(),
      "DELETE",
      &format!("/api/rules/{career_id}"),
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["deleted"], 1);

    let resp =
      send(app, "DELETE", &format!("/api/rules/{career_id}"), None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── Consultation flow ───────────────────────────────────────────────────

  /// Two single-skill careers weighted 0.8 and 0.4 over a shared
  /// interest.
  async fn seed_two_careers(app: &Router) {
    create(app, "/api/interests", json!({"name": "Menggambar"})).await;
    create(
      app,
      "/api/skills",
      json!({"name": "Ilustrasi", "description": "d"}),
    )
    .await;
    create(
      app,
      "/api/skills",
      json!({"name": "Menulis", "description": "d"}),
    )
    .await;
    seed_career(app, "Animator", &["MIN01"], &["KEA01"], 0.8).await;
    seed_career(app, "Penulis", &["MIN01"], &["KEA02"], 0.4).await;
  }

  #[tokio::test]
  async fn consultation_ranks_and_persists() {
    let app = app().await;
    seed_two_careers(&app).await;

    let resp = send(
      app.clone(),
      "POST",
      "/api/consultations",
      Some(json!({
        "user_id":      "user-1",
        "interest_ids": ["MIN01"],
        "skill_ids":    ["KEA01", "KEA02"],
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = json_body(resp).await;
    assert_eq!(body["id"], "KON01");

    // ceil(0.8/1.2·100) = 67, ceil(0.4/1.2·100) = 34
    let result = body["result"].as_array().unwrap();
    assert_eq!(result.len(), 2);
    assert_eq!(result[0]["career_id"], "KAR01");
    assert_eq!(result[0]["career_name"], "Animator");
    assert_eq!(result[0]["percentage"], 67);
    assert_eq!(result[1]["career_id"], "KAR02");
    assert_eq!(result[1]["percentage"], 34);

    // The stored consultation round-trips.
    let resp = send(app.clone(), "GET", "/api/consultations/KON01", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let stored = json_body(resp).await;
    assert_eq!(stored["user_id"], "user-1");
    assert_eq!(stored["result"], body["result"]);
  }

  #[tokio::test]
  async fn consultation_rejects_bad_selections() {
    let app = app().await;
    seed_two_careers(&app).await;

    let resp = send(
      app.clone(),
      "POST",
      "/api/consultations",
      Some(json!({
        "user_id":      "user-1",
        "interest_ids": [],
        "skill_ids":    ["KEA01"],
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = send(
      app,
      "POST",
      "/api/consultations",
      Some(json!({
        "user_id":      "user-1",
        "interest_ids": ["MIN01"],
        "skill_ids":    ["KEA99"],
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn consultation_with_no_matches_stores_empty_result() {
    let app = app().await;
    seed_two_careers(&app).await;
    // A selection that matches no rule pair: the extra interest and
    // skill exist but no rule links them.
    create(&app, "/api/interests", json!({"name": "Olahraga"})).await;
    create(
      &app,
      "/api/skills",
      json!({"name": "Lari", "description": "d"}),
    )
    .await;

    let resp = send(
      app.clone(),
      "POST",
      "/api/consultations",
      Some(json!({
        "user_id":      "user-1",
        "interest_ids": ["MIN02"],
        "skill_ids":    ["KEA03"],
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = json_body(resp).await;
    assert!(body["result"].as_array().unwrap().is_empty());

    // The outcome view has no winner to show.
    let resp =
      send(app, "GET", "/api/consultations/KON01/outcome", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn result_view_zero_fills_remaining_careers() {
    let app = app().await;
    seed_two_careers(&app).await;
    // A third career with no rules never enters the stored result.
    create(
      &app,
      "/api/careers",
      json!({"name": "Arsitek", "description": "d", "development_notes": null}),
    )
    .await;

    send(
      app.clone(),
      "POST",
      "/api/consultations",
      Some(json!({
        "user_id":      "user-1",
        "interest_ids": ["MIN01"],
        "skill_ids":    ["KEA01"],
      })),
    )
    .await;

    let resp =
      send(app, "GET", "/api/consultations/KON01/result", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let view = json_body(resp).await;
    let view = view.as_array().unwrap();
    assert_eq!(view.len(), 3);
    // Stored ranking first, zero-filled careers after.
    assert_eq!(view[0]["career_id"], "KAR01");
    assert_eq!(view[0]["percentage"], 100);
    assert!(
      view[1..]
        .iter()
        .all(|entry| entry["percentage"] == 0)
    );
  }

  #[tokio::test]
  async fn outcome_view_expands_the_winner() {
    let app = app().await;
    seed_two_careers(&app).await;

    send(
      app.clone(),
      "POST",
      "/api/consultations",
      Some(json!({
        "user_id":      "user-1",
        "interest_ids": ["MIN01"],
        "skill_ids":    ["KEA01", "KEA02"],
      })),
    )
    .await;

    let resp =
      send(app, "GET", "/api/consultations/KON01/outcome", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let outcome = json_body(resp).await;
    assert_eq!(outcome["career"]["id"], "KAR01");
    assert_eq!(outcome["career"]["name"], "Animator");
    assert_eq!(outcome["percentage"], 67);
    assert_eq!(outcome["interests"].as_array().unwrap().len(), 1);
    assert_eq!(outcome["skills"].as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn answers_view_resolves_names() {
    let app = app().await;
    seed_two_careers(&app).await;

    send(
      app.clone(),
      "POST",
      "/api/consultations",
      Some(json!({
        "user_id":      "user-1",
        "interest_ids": ["MIN01"],
        "skill_ids":    ["KEA01", "KEA02"],
      })),
    )
    .await;

    let resp =
      send(app, "GET", "/api/consultations/KON01/answers", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let answers = json_body(resp).await;
    assert_eq!(answers["interests"], json!(["Menggambar"]));
    assert_eq!(answers["skills"], json!(["Ilustrasi", "Menulis"]));
  }

  #[tokio::test]
  async fn history_groups_answers_per_consultation() {
    let app = app().await;
    seed_two_careers(&app).await;

    for _ in 0..2 {
      send(
        app.clone(),
        "POST",
        "/api/consultations",
        Some(json!({
          "user_id":      "user-1",
          "interest_ids": ["MIN01"],
          "skill_ids":    ["KEA01", "KEA02"],
        })),
      )
      .await;
    }

    let resp =
      send(app.clone(), "GET", "/api/history?user_id=user-1", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let entries = json_body(resp).await;
    let entries = entries.as_array().unwrap().clone();
    assert_eq!(entries.len(), 2);
    // 1 interest × 2 skills per consultation.
    assert!(
      entries
        .iter()
        .all(|e| e["pairs"].as_array().unwrap().len() == 2)
    );

    // Unknown users simply have no history.
    let resp =
      send(app, "GET", "/api/history?user_id=nobody", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(json_body(resp).await.as_array().unwrap().is_empty());
  }

  #[tokio::test]
  async fn delete_consultation_removes_history() {
    let app = app().await;
    seed_two_careers(&app).await;

    send(
      app.clone(),
      "POST",
      "/api/consultations",
      Some(json!({
        "user_id":      "user-1",
        "interest_ids": ["MIN01"],
        "skill_ids":    ["KEA01"],
      })),
    )
    .await;

    let resp =
      send(app.clone(), "DELETE", "/api/consultations/KON01", None).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp =
      send(app.clone(), "GET", "/api/history?user_id=user-1", None).await;
    assert!(json_body(resp).await.as_array().unwrap().is_empty());

    let resp = send(app, "DELETE", "/api/consultations/KON01", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}
