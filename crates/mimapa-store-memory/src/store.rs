//! [`MemoryStore`] — the in-process implementation of [`MarkerStore`] and
//! [`VisitLedger`].

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use uuid::Uuid;

use mimapa_core::{
  error::StoreError,
  marker::{Marker, MarkerDraft, MarkerPatch},
  store::{MarkerStore, VisitLedger},
  visit::{Visit, VisitDraft},
};

/// Marker and visit system of record held entirely in process memory.
///
/// Cloning is cheap — all clones share the same reference-counted state.
#[derive(Clone, Default)]
pub struct MemoryStore {
  inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
  markers: Vec<Marker>,
  visits:  Vec<Visit>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  fn lock(&self) -> MutexGuard<'_, Inner> {
    // The lock is only ever held for short, non-panicking sections.
    self.inner.lock().expect("store state poisoned")
  }
}

// ─── MarkerStore ─────────────────────────────────────────────────────────────

impl MarkerStore for MemoryStore {
  async fn create(&self, draft: MarkerDraft) -> Result<Marker, StoreError> {
    draft.validate()?;

    let marker = Marker {
      marker_id: Uuid::new_v4(),
      place:     draft.place,
      lat:       draft.lat,
      lon:       draft.lon,
      owner:     draft.owner,
      image_url: draft.image_url,
    };
    self.lock().markers.push(marker.clone());
    Ok(marker)
  }

  async fn get(&self, id: Uuid) -> Result<Option<Marker>, StoreError> {
    Ok(
      self
        .lock()
        .markers
        .iter()
        .find(|m| m.marker_id == id)
        .cloned(),
    )
  }

  async fn list_by_owner(&self, owner: &str) -> Result<Vec<Marker>, StoreError> {
    Ok(
      self
        .lock()
        .markers
        .iter()
        .filter(|m| m.owner == owner)
        .cloned()
        .collect(),
    )
  }

  async fn update(
    &self,
    id: Uuid,
    patch: MarkerPatch,
  ) -> Result<Marker, StoreError> {
    if patch.is_empty() {
      return Err(StoreError::Validation(
        "no marker fields specified".into(),
      ));
    }

    let mut inner = self.lock();
    let marker = inner
      .markers
      .iter_mut()
      .find(|m| m.marker_id == id)
      .ok_or(StoreError::NotFound(id))?;

    patch.apply(marker);
    Ok(marker.clone())
  }

  async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
    let mut inner = self.lock();
    let before = inner.markers.len();
    inner.markers.retain(|m| m.marker_id != id);

    if inner.markers.len() == before {
      return Err(StoreError::NotFound(id));
    }
    Ok(())
  }
}

// ─── VisitLedger ─────────────────────────────────────────────────────────────

impl VisitLedger for MemoryStore {
  async fn record(&self, draft: VisitDraft) -> Result<Visit, StoreError> {
    if draft.visited.trim().is_empty() || draft.visitor.trim().is_empty() {
      return Err(StoreError::Validation(
        "visited and visitor must not be empty".into(),
      ));
    }

    let visit = Visit {
      visit_id:         Uuid::new_v4(),
      visited:          draft.visited,
      visitor:          draft.visitor,
      credential_token: draft.credential_token,
      timestamp:        Utc::now(),
    };
    self.lock().visits.push(visit.clone());
    Ok(visit)
  }

  async fn list_by_visited(&self, visited: &str) -> Result<Vec<Visit>, StoreError> {
    let mut visits: Vec<Visit> = self
      .lock()
      .visits
      .iter()
      .filter(|v| v.visited == visited)
      .cloned()
      .collect();

    // Insertion order already matches the ledger clock, but the ascending
    // contract must hold even if entries are ever backfilled.
    visits.sort_by_key(|v| v.timestamp);
    Ok(visits)
  }
}
