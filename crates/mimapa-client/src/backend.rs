//! Async HTTP client wrapping the MiMapa backend JSON API.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use uuid::Uuid;

use mimapa_core::{
  error::StoreError,
  marker::{Marker, MarkerDraft, MarkerPatch},
  store::{MarkerStore, MediaStore, VisitLedger},
  visit::{Visit, VisitDraft},
};

/// Connection settings for the backend API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Async HTTP client for the backend marker, visit, and media endpoints.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self, StoreError> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .map_err(|e| StoreError::Network(format!("failed to build HTTP client: {e}")))?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }
}

// ─── Error mapping ───────────────────────────────────────────────────────────

/// Shape of the backend's `{"error": …}` envelope.
#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

fn transport(e: reqwest::Error) -> StoreError {
  StoreError::Network(e.to_string())
}

fn decode(e: reqwest::Error) -> StoreError {
  StoreError::Network(format!("deserialising response: {e}"))
}

/// Map a non-success response to the matching [`StoreError`].
///
/// `id` is the record the request addressed, if any; it gives 404s a
/// meaningful [`StoreError::NotFound`] payload.
async fn error_for(resp: Response, id: Option<Uuid>) -> StoreError {
  let status = resp.status();
  let message = resp
    .json::<ErrorBody>()
    .await
    .map(|b| b.error)
    .unwrap_or_else(|_| status.to_string());

  match status {
    StatusCode::NOT_FOUND => StoreError::NotFound(id.unwrap_or_else(Uuid::nil)),
    StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
      StoreError::Validation(message)
    }
    s => StoreError::Backend { status: s.as_u16() },
  }
}

// ─── MarkerStore ─────────────────────────────────────────────────────────────

impl MarkerStore for ApiClient {
  /// `POST /api/markers`
  async fn create(&self, draft: MarkerDraft) -> Result<Marker, StoreError> {
    // Local validation first; an invalid draft never goes over the wire.
    draft.validate()?;

    let resp = self
      .client
      .post(self.url("/markers"))
      .json(&draft)
      .send()
      .await
      .map_err(transport)?;

    if !resp.status().is_success() {
      return Err(error_for(resp, None).await);
    }
    resp.json().await.map_err(decode)
  }

  /// `GET /api/markers/:id`
  async fn get(&self, id: Uuid) -> Result<Option<Marker>, StoreError> {
    let resp = self
      .client
      .get(self.url(&format!("/markers/{id}")))
      .send()
      .await
      .map_err(transport)?;

    if resp.status() == StatusCode::NOT_FOUND {
      return Ok(None);
    }
    if !resp.status().is_success() {
      return Err(error_for(resp, Some(id)).await);
    }
    resp.json().await.map(Some).map_err(decode)
  }

  /// `GET /api/markers?owner=<email>`
  async fn list_by_owner(&self, owner: &str) -> Result<Vec<Marker>, StoreError> {
    let resp = self
      .client
      .get(self.url("/markers"))
      .query(&[("owner", owner)])
      .send()
      .await
      .map_err(transport)?;

    if !resp.status().is_success() {
      return Err(error_for(resp, None).await);
    }
    resp.json().await.map_err(decode)
  }

  /// `PUT /api/markers/:id`
  async fn update(&self, id: Uuid, patch: MarkerPatch) -> Result<Marker, StoreError> {
    let resp = self
      .client
      .put(self.url(&format!("/markers/{id}")))
      .json(&patch)
      .send()
      .await
      .map_err(transport)?;

    if !resp.status().is_success() {
      return Err(error_for(resp, Some(id)).await);
    }
    resp.json().await.map_err(decode)
  }

  /// `DELETE /api/markers/:id`
  async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
    let resp = self
      .client
      .delete(self.url(&format!("/markers/{id}")))
      .send()
      .await
      .map_err(transport)?;

    if !resp.status().is_success() {
      return Err(error_for(resp, Some(id)).await);
    }
    Ok(())
  }
}

// ─── VisitLedger ─────────────────────────────────────────────────────────────

impl VisitLedger for ApiClient {
  /// `POST /api/visits`
  async fn record(&self, draft: VisitDraft) -> Result<Visit, StoreError> {
    let resp = self
      .client
      .post(self.url("/visits"))
      .json(&draft)
      .send()
      .await
      .map_err(transport)?;

    if !resp.status().is_success() {
      return Err(error_for(resp, None).await);
    }
    resp.json().await.map_err(decode)
  }

  /// `GET /api/visits?visited=<email>`
  async fn list_by_visited(&self, visited: &str) -> Result<Vec<Visit>, StoreError> {
    let resp = self
      .client
      .get(self.url("/visits"))
      .query(&[("visited", visited)])
      .send()
      .await
      .map_err(transport)?;

    if !resp.status().is_success() {
      return Err(error_for(resp, None).await);
    }
    resp.json().await.map_err(decode)
  }
}

// ─── MediaStore ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct UploadResponse {
  url: String,
}

impl MediaStore for ApiClient {
  /// `POST /api/media?filename=<name>` — body is the raw content.
  async fn upload(&self, filename: String, bytes: Vec<u8>) -> Result<String, StoreError> {
    let resp = self
      .client
      .post(self.url("/media"))
      .query(&[("filename", filename.as_str())])
      .body(bytes)
      .send()
      .await
      .map_err(transport)?;

    if !resp.status().is_success() {
      return Err(error_for(resp, None).await);
    }
    let body: UploadResponse = resp.json().await.map_err(decode)?;
    Ok(body.url)
  }
}
