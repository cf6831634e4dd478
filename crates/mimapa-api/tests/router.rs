//! Router-level tests: status codes and wire shapes for every endpoint.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use mimapa_api::{AppState, MediaBucket};
use mimapa_core::marker::Marker;
use mimapa_store_memory::MemoryStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

fn app() -> Router {
  let state = AppState {
    store: Arc::new(MemoryStore::new()),
    media: MediaBucket::new(),
    public_url: "http://test.local".to_string(),
  };
  Router::new().nest("/api", mimapa_api::api_router(state))
}

async fn body_json(response: axum::response::Response) -> Value {
  let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
    .await
    .expect("collecting body");
  serde_json::from_slice(&bytes).expect("body is JSON")
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
  Request::builder()
    .method(method)
    .uri(uri)
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from(body.to_string()))
    .expect("building request")
}

fn get_request(uri: &str) -> Request<Body> {
  Request::builder()
    .uri(uri)
    .body(Body::empty())
    .expect("building request")
}

fn paris_body(owner: &str) -> Value {
  json!({
    "place": "Paris",
    "lat": 48.8566,
    "lon": 2.3522,
    "owner": owner,
    "image_url": null,
  })
}

// ─── Markers ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_then_get_marker() {
  let app = app();

  let response = app
    .clone()
    .oneshot(json_request(
      "POST",
      "/api/markers",
      paris_body("alice@example.com"),
    ))
    .await
    .unwrap();
  assert_eq!(response.status(), StatusCode::CREATED);

  let created: Marker = serde_json::from_value(body_json(response).await).unwrap();
  assert_eq!(created.place, "Paris");

  let response = app
    .oneshot(get_request(&format!("/api/markers/{}", created.marker_id)))
    .await
    .unwrap();
  assert_eq!(response.status(), StatusCode::OK);

  let fetched: Marker = serde_json::from_value(body_json(response).await).unwrap();
  assert_eq!(fetched, created);
}

#[tokio::test]
async fn get_unknown_marker_is_404_with_error_envelope() {
  let response = app()
    .oneshot(get_request(
      "/api/markers/00000000-0000-0000-0000-000000000000",
    ))
    .await
    .unwrap();
  assert_eq!(response.status(), StatusCode::NOT_FOUND);

  let body = body_json(response).await;
  assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn list_requires_owner_param() {
  let response = app().oneshot(get_request("/api/markers")).await.unwrap();
  assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_filters_by_owner() {
  let app = app();

  for owner in ["alice@example.com", "bob@example.com", "alice@example.com"] {
    let response = app
      .clone()
      .oneshot(json_request("POST", "/api/markers", paris_body(owner)))
      .await
      .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
  }

  let response = app
    .oneshot(get_request("/api/markers?owner=alice%40example.com"))
    .await
    .unwrap();
  assert_eq!(response.status(), StatusCode::OK);

  let markers: Vec<Marker> = serde_json::from_value(body_json(response).await).unwrap();
  assert_eq!(markers.len(), 2);
  assert!(markers.iter().all(|m| m.owner == "alice@example.com"));
}

#[tokio::test]
async fn empty_patch_is_unprocessable() {
  let app = app();

  let response = app
    .clone()
    .oneshot(json_request(
      "POST",
      "/api/markers",
      paris_body("alice@example.com"),
    ))
    .await
    .unwrap();
  let created: Marker = serde_json::from_value(body_json(response).await).unwrap();

  let response = app
    .oneshot(json_request(
      "PUT",
      &format!("/api/markers/{}", created.marker_id),
      json!({}),
    ))
    .await
    .unwrap();
  assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn delete_then_delete_again() {
  let app = app();

  let response = app
    .clone()
    .oneshot(json_request(
      "POST",
      "/api/markers",
      paris_body("alice@example.com"),
    ))
    .await
    .unwrap();
  let created: Marker = serde_json::from_value(body_json(response).await).unwrap();
  let uri = format!("/api/markers/{}", created.marker_id);

  let response = app
    .clone()
    .oneshot(
      Request::builder()
        .method("DELETE")
        .uri(&uri)
        .body(Body::empty())
        .unwrap(),
    )
    .await
    .unwrap();
  assert_eq!(response.status(), StatusCode::NO_CONTENT);

  // The id is gone now; the store reports that honestly and callers that
  // want idempotence map it to success themselves.
  let response = app
    .oneshot(
      Request::builder()
        .method("DELETE")
        .uri(&uri)
        .body(Body::empty())
        .unwrap(),
    )
    .await
    .unwrap();
  assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ─── Visits ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn record_and_list_visits_ascending() {
  let app = app();

  for visitor in ["alice@example.com", "carol@example.com"] {
    let response = app
      .clone()
      .oneshot(json_request(
        "POST",
        "/api/visits",
        json!({
          "visited": "bob@example.com",
          "visitor": visitor,
          "credential_token": "tok-1",
        }),
      ))
      .await
      .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
  }

  let response = app
    .oneshot(get_request("/api/visits?visited=bob%40example.com"))
    .await
    .unwrap();
  assert_eq!(response.status(), StatusCode::OK);

  let visits = body_json(response).await;
  let visits = visits.as_array().unwrap();
  assert_eq!(visits.len(), 2);
  assert_eq!(visits[0]["visitor"], "alice@example.com");
  assert_eq!(visits[1]["visitor"], "carol@example.com");
}

// ─── Media ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upload_and_serve_media() {
  let app = app();

  let response = app
    .clone()
    .oneshot(
      Request::builder()
        .method("POST")
        .uri("/api/media?filename=pin.png")
        .body(Body::from(&b"\x89PNG fake bytes"[..]))
        .unwrap(),
    )
    .await
    .unwrap();
  assert_eq!(response.status(), StatusCode::CREATED);

  let url = body_json(response).await["url"].as_str().unwrap().to_string();
  assert!(url.starts_with("http://test.local/api/media/"));

  // Serve it back through the path portion of the minted URL.
  let path = url.strip_prefix("http://test.local").unwrap().to_string();
  let response = app.oneshot(get_request(&path)).await.unwrap();
  assert_eq!(response.status(), StatusCode::OK);
  assert_eq!(
    response.headers()[header::CONTENT_TYPE],
    "image/png"
  );

  let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
    .await
    .unwrap();
  assert_eq!(&bytes[..], b"\x89PNG fake bytes");
}
