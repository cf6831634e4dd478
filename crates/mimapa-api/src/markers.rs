//! Handlers for `/markers` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/markers` | `?owner=<email>` required |
//! | `POST`   | `/markers` | Body: [`MarkerDraft`]; returns 201 + stored marker |
//! | `GET`    | `/markers/:id` | 404 if not found |
//! | `PUT`    | `/markers/:id` | Body: [`MarkerPatch`]; 422 on an empty patch |
//! | `DELETE` | `/markers/:id` | 204 on success, 404 on unknown id |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use mimapa_core::{
  marker::{Marker, MarkerDraft, MarkerPatch},
  store::{MarkerStore, VisitLedger},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// The owner whose markers to return.
  pub owner: String,
}

/// `GET /markers?owner=<email>`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Marker>>, ApiError>
where
  S: MarkerStore + VisitLedger,
{
  let markers = state.store.list_by_owner(&params.owner).await?;
  Ok(Json(markers))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /markers` — body: [`MarkerDraft`]
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(draft): Json<MarkerDraft>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MarkerStore + VisitLedger,
{
  let marker = state.store.create(draft).await?;
  Ok((StatusCode::CREATED, Json(marker)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /markers/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Marker>, ApiError>
where
  S: MarkerStore + VisitLedger,
{
  let marker = state
    .store
    .get(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("marker {id} not found")))?;
  Ok(Json(marker))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /markers/:id` — body: [`MarkerPatch`]
pub async fn update_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(patch): Json<MarkerPatch>,
) -> Result<Json<Marker>, ApiError>
where
  S: MarkerStore + VisitLedger,
{
  let marker = state.store.update(id, patch).await?;
  Ok(Json(marker))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /markers/:id`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: MarkerStore + VisitLedger,
{
  state.store.delete(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
