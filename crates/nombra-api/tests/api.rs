//! Integration tests for the JSON API against an in-memory SQLite store.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use nombra_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;
use uuid::Uuid;

async fn app() -> Router<()> {
  let store = SqliteStore::open_in_memory().await.expect("in-memory store");
  nombra_api::api_router(Arc::new(store))
}

async fn send(app: &Router<()>, request: Request<Body>) -> (StatusCode, Value) {
  let response = app.clone().oneshot(request).await.unwrap();
  let status = response.status();
  let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
    .await
    .unwrap();
  let body = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, body)
}

fn get(uri: &str) -> Request<Body> {
  Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
  Request::builder()
    .method("POST")
    .uri(uri)
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from(body.to_string()))
    .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
  Request::builder()
    .method("DELETE")
    .uri(uri)
    .body(Body::empty())
    .unwrap()
}

/// POST a name and return its id.
async fn add_name(app: &Router<()>, text: &str, category: &str) -> Uuid {
  let (status, body) = send(
    app,
    post(
      "/names",
      json!({ "text": text, "category": category, "suggested_by": Uuid::new_v4() }),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "add_name failed: {body}");
  body["name_id"].as_str().unwrap().parse().unwrap()
}

// ─── Names ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_list_names() {
  let app = app().await;
  add_name(&app, "Alma", "girl").await;
  add_name(&app, "Bruno", "boy").await;

  let (status, body) = send(&app, get("/names")).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body.as_array().unwrap().len(), 2);

  let (status, body) = send(&app, get("/names?category=girl")).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body.as_array().unwrap().len(), 1);
  assert_eq!(body[0]["text"], "Alma");
}

#[tokio::test]
async fn blank_and_duplicate_names_are_rejected() {
  let app = app().await;
  add_name(&app, "Alma", "girl").await;

  let (status, _) = send(
    &app,
    post(
      "/names",
      json!({ "text": "  ", "category": "girl", "suggested_by": Uuid::new_v4() }),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, _) = send(
    &app,
    post(
      "/names",
      json!({ "text": "alma", "category": "girl", "suggested_by": Uuid::new_v4() }),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  // Same text in the other category is fine.
  let (status, _) = send(
    &app,
    post(
      "/names",
      json!({ "text": "Alma", "category": "boy", "suggested_by": Uuid::new_v4() }),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn get_unknown_name_is_404() {
  let app = app().await;
  let (status, _) = send(&app, get(&format!("/names/{}", Uuid::new_v4()))).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── The vote flow ───────────────────────────────────────────────────────────

#[tokio::test]
async fn matchmake_vote_and_exhaust() {
  let app = app().await;
  let a = add_name(&app, "Alma", "girl").await;
  let b = add_name(&app, "Vera", "girl").await;
  let voter = Uuid::new_v4();

  // Exactly one possible pair.
  let (status, body) = send(&app, get(&format!("/duels/next?voter={voter}"))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "pair");

  let (status, body) = send(
    &app,
    post(
      "/duels",
      json!({ "voter_id": voter, "winner_id": a, "loser_id": b }),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["winner"]["rating"], 1016);
  assert_eq!(body["loser"]["rating"], 984);

  // The only pair is now voted.
  let (_, body) = send(&app, get(&format!("/duels/next?voter={voter}"))).await;
  assert_eq!(body["status"], "exhausted");
}

#[tokio::test]
async fn single_name_is_not_enough() {
  let app = app().await;
  add_name(&app, "Alma", "girl").await;

  let (_, body) =
    send(&app, get(&format!("/duels/next?voter={}", Uuid::new_v4()))).await;
  assert_eq!(body["status"], "not_enough_names");
}

#[tokio::test]
async fn invalid_duels_map_to_client_errors() {
  let app = app().await;
  let a = add_name(&app, "Alma", "girl").await;
  let b = add_name(&app, "Bruno", "boy").await;
  let voter = Uuid::new_v4();

  // Cross-category: 400.
  let (status, _) = send(
    &app,
    post("/duels", json!({ "voter_id": voter, "winner_id": a, "loser_id": b })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  // Self-duel: 400.
  let (status, _) = send(
    &app,
    post("/duels", json!({ "voter_id": voter, "winner_id": a, "loser_id": a })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  // Unknown name: 404.
  let (status, _) = send(
    &app,
    post(
      "/duels",
      json!({ "voter_id": voter, "winner_id": a, "loser_id": Uuid::new_v4() }),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Rankings ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn personal_and_combined_rankings() {
  let app = app().await;
  let a = add_name(&app, "Alma", "girl").await;
  let b = add_name(&app, "Vera", "girl").await;
  let voter = Uuid::new_v4();

  send(
    &app,
    post("/duels", json!({ "voter_id": voter, "winner_id": a, "loser_id": b })),
  )
  .await;

  // Personal: the voter's own records.
  let (status, body) =
    send(&app, get(&format!("/rankings/girl?voter={voter}"))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body[0]["name"]["name_id"].as_str().unwrap(), a.to_string());
  assert_eq!(body[0]["rating"], 1016);
  assert_eq!(body[1]["rating"], 984);

  // A stranger sees all defaults.
  let (_, body) =
    send(&app, get(&format!("/rankings/girl?voter={}", Uuid::new_v4()))).await;
  assert_eq!(body[0]["rating"], 1000);
  assert_eq!(body[1]["rating"], 1000);

  // Combined: one voter's ratings averaged, with the breakdown attached.
  let (_, body) = send(&app, get("/rankings/girl")).await;
  assert_eq!(body[0]["rating"], 1016);
  assert_eq!(body[0]["voter_ratings"].as_array().unwrap().len(), 1);
}

// ─── Corrective paths ────────────────────────────────────────────────────────

#[tokio::test]
async fn deleting_a_name_reports_the_cascade() {
  let app = app().await;
  let a = add_name(&app, "Alma", "girl").await;
  let b = add_name(&app, "Vera", "girl").await;
  let voter = Uuid::new_v4();

  send(
    &app,
    post("/duels", json!({ "voter_id": voter, "winner_id": a, "loser_id": b })),
  )
  .await;

  let (status, body) = send(&app, delete(&format!("/names/{a}"))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["outcomes_removed"], 1);
  assert_eq!(body["scores_removed"], 1);
  assert_eq!(body["voters_recalculated"].as_array().unwrap().len(), 1);

  // With its only outcome gone, B is back to having no record.
  let (_, body) = send(&app, get(&format!("/rankings/girl?voter={voter}"))).await;
  assert_eq!(body[0]["rating"], 1000);
  assert_eq!(body[0]["matches"], 0);
}

#[tokio::test]
async fn reset_purges_everything() {
  let app = app().await;
  let a = add_name(&app, "Alma", "girl").await;
  let b = add_name(&app, "Vera", "girl").await;
  let voter = Uuid::new_v4();
  send(
    &app,
    post("/duels", json!({ "voter_id": voter, "winner_id": a, "loser_id": b })),
  )
  .await;

  let (status, _) = send(&app, post("/admin/reset", json!({}))).await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (_, body) = send(&app, get("/names")).await;
  assert!(body.as_array().unwrap().is_empty());
}
