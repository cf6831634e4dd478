//! Handlers for `/visits` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/visits` | `?visited=<email>` required; timestamp ascending |
//! | `POST` | `/visits` | Body: [`VisitDraft`]; returns 201 + stored visit |
//!
//! Visits are append-only: there is deliberately no update or delete
//! route.

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use mimapa_core::{
  store::{MarkerStore, VisitLedger},
  visit::{Visit, VisitDraft},
};
use serde::Deserialize;

use crate::{AppState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// The visited identity whose audit trail to return.
  pub visited: String,
}

/// `GET /visits?visited=<email>`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Visit>>, ApiError>
where
  S: MarkerStore + VisitLedger,
{
  let visits = state.store.list_by_visited(&params.visited).await?;
  Ok(Json(visits))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /visits` — body: [`VisitDraft`]
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(draft): Json<VisitDraft>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MarkerStore + VisitLedger,
{
  let visit = state.store.record(draft).await?;
  Ok((StatusCode::CREATED, Json(visit)))
}
