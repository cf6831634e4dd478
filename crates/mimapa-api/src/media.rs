//! Handlers for the media capability: binary content in, durable URL out.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/media?filename=<name>` | Raw request body; returns 201 + `{"url": …}` |
//! | `GET`  | `/media/:id` | Serves the stored bytes with their content type |
//!
//! Storage is in-memory, matching the backing store — durable for the
//! process lifetime, which is what the development server needs.

use std::{
  collections::HashMap,
  sync::{Arc, Mutex},
};

use axum::{
  Json,
  body::Bytes,
  extract::{Path, Query, State},
  http::{StatusCode, header},
  response::IntoResponse,
};
use mimapa_core::store::{MarkerStore, VisitLedger};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

// ─── Bucket ───────────────────────────────────────────────────────────────────

struct StoredMedia {
  filename:     String,
  content_type: String,
  bytes:        Vec<u8>,
}

/// In-memory blob storage shared across handlers.
///
/// Cloning is cheap — all clones share the same reference-counted map.
#[derive(Clone, Default)]
pub struct MediaBucket {
  inner: Arc<Mutex<HashMap<Uuid, StoredMedia>>>,
}

impl MediaBucket {
  pub fn new() -> Self {
    Self::default()
  }
}

// ─── Upload ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UploadParams {
  pub filename: String,
}

/// `POST /media?filename=<name>` — raw request body is the content.
pub async fn upload<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<UploadParams>,
  body: Bytes,
) -> Result<impl IntoResponse, ApiError>
where
  S: MarkerStore + VisitLedger,
{
  if body.is_empty() {
    return Err(ApiError::BadRequest("empty upload body".into()));
  }

  let id = Uuid::new_v4();
  let media = StoredMedia {
    content_type: content_type_for(&params.filename),
    filename:     params.filename,
    bytes:        body.to_vec(),
  };

  state
    .media
    .inner
    .lock()
    .expect("media bucket poisoned")
    .insert(id, media);

  let url = format!("{}/api/media/{id}", state.public_url.trim_end_matches('/'));
  Ok((StatusCode::CREATED, Json(json!({ "url": url }))))
}

// ─── Serve ────────────────────────────────────────────────────────────────────

/// `GET /media/:id`
pub async fn serve<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MarkerStore + VisitLedger,
{
  let bucket = state.media.inner.lock().expect("media bucket poisoned");
  let media = bucket
    .get(&id)
    .ok_or_else(|| ApiError::NotFound(format!("media {id} not found")))?;

  Ok((
    [
      (header::CONTENT_TYPE, media.content_type.clone()),
      (
        header::CONTENT_DISPOSITION,
        format!("inline; filename=\"{}\"", media.filename),
      ),
    ],
    media.bytes.clone(),
  ))
}

/// Guess a content type from the filename extension.
fn content_type_for(filename: &str) -> String {
  let ext = filename.rsplit('.').next().unwrap_or_default();
  match ext.to_ascii_lowercase().as_str() {
    "jpg" | "jpeg" => "image/jpeg",
    "png" => "image/png",
    "gif" => "image/gif",
    "webp" => "image/webp",
    _ => "application/octet-stream",
  }
  .to_string()
}
