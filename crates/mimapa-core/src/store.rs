//! The collaborator traits the orchestration layer is written against.
//!
//! Backends (`mimapa-store-memory`) and HTTP clients (`mimapa-client`)
//! implement these; higher layers (`mimapa-api`, `mimapa-session`) depend
//! on the abstractions, not on any concrete implementation.

use std::future::Future;

use uuid::Uuid;

use crate::{
  error::{GeocodeError, StoreError},
  geo::Resolution,
  marker::{Marker, MarkerDraft, MarkerPatch},
  visit::{Visit, VisitDraft},
};

// ─── Markers ─────────────────────────────────────────────────────────────────

/// System of record for [`Marker`]s.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait MarkerStore: Send + Sync {
  /// Persist a new marker. The store assigns `marker_id`.
  ///
  /// Fails with [`StoreError::Validation`] before touching the backend if
  /// the draft is locally invalid.
  fn create(
    &self,
    draft: MarkerDraft,
  ) -> impl Future<Output = Result<Marker, StoreError>> + Send + '_;

  /// Retrieve a marker by id. `None` is confirmed absence, not a failure.
  fn get(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Marker>, StoreError>> + Send + '_;

  /// All markers owned by `owner`. The backend does not guarantee any
  /// ordering, insertion or otherwise.
  fn list_by_owner<'a>(
    &'a self,
    owner: &'a str,
  ) -> impl Future<Output = Result<Vec<Marker>, StoreError>> + Send + 'a;

  /// Apply a partial update and return the stored result.
  fn update(
    &self,
    id: Uuid,
    patch: MarkerPatch,
  ) -> impl Future<Output = Result<Marker, StoreError>> + Send + '_;

  /// Delete a marker. An unknown id surfaces [`StoreError::NotFound`];
  /// callers treating deletion as idempotent map that to success.
  fn delete(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), StoreError>> + Send + '_;
}

// ─── Visits ──────────────────────────────────────────────────────────────────

/// Append-only recorder of visit events.
pub trait VisitLedger: Send + Sync {
  /// Append one visit. The ledger assigns `visit_id` and `timestamp`.
  fn record(
    &self,
    draft: VisitDraft,
  ) -> impl Future<Output = Result<Visit, StoreError>> + Send + '_;

  /// All visits received by `visited`, timestamp ascending for stable
  /// display.
  fn list_by_visited<'a>(
    &'a self,
    visited: &'a str,
  ) -> impl Future<Output = Result<Vec<Visit>, StoreError>> + Send + 'a;
}

// ─── Geocoding ───────────────────────────────────────────────────────────────

/// Free-text place resolution.
pub trait Geocoder: Send + Sync {
  /// Resolve `place` to coordinates. Empty input fails with
  /// [`GeocodeError::EmptyQuery`] before any network round trip; a
  /// confirmed empty candidate list is `Ok(Resolution::NotFound)`.
  fn resolve<'a>(
    &'a self,
    place: &'a str,
  ) -> impl Future<Output = Result<Resolution, GeocodeError>> + Send + 'a;
}

// ─── Media ───────────────────────────────────────────────────────────────────

/// Media upload capability: binary content in, durable URL out.
///
/// The returned URL is used verbatim as [`Marker::image_url`].
pub trait MediaStore: Send + Sync {
  fn upload(
    &self,
    filename: String,
    bytes: Vec<u8>,
  ) -> impl Future<Output = Result<String, StoreError>> + Send + '_;
}
