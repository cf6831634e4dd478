//! The marker and visit workflows, composed over the collaborator traits.

use std::{collections::HashSet, sync::Mutex};

use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use mimapa_core::{
  error::{GeocodeError, StoreError},
  geo::{Coordinates, Resolution},
  identity::{IdentityProvider, Session},
  marker::{Marker, MarkerDraft, MarkerPatch},
  store::{Geocoder, MarkerStore, VisitLedger},
  visit::{Visit, VisitDraft},
};

use crate::cache::ActiveMarkerCache;

// Fixed user-facing messages. Collaborator error detail goes to the log,
// never to the user.
const MSG_LOAD_MAP: &str = "could not load the map";
const MSG_LOAD_MARKER: &str = "could not load the marker";
const MSG_SAVE: &str = "could not save the marker";
const MSG_DELETE: &str = "could not delete the marker";
const MSG_GEOCODE: &str = "address lookup failed";
const MSG_VISITS: &str = "could not load the visit log";

// ─── Errors and outcomes ─────────────────────────────────────────────────────

/// The only failure surface the UI ever sees.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlowError {
  #[error("you must be signed in to do that")]
  NotAuthenticated,

  #[error("{0}")]
  InvalidInput(&'static str),

  #[error("a save for this marker is already in progress")]
  SaveInFlight,

  #[error("{0}")]
  Failed(&'static str),
}

/// Result of a map search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
  Loaded(Vec<Marker>),
  /// The target has no markers. An unknown identity looks the same — the
  /// backend does not distinguish.
  Empty,
}

/// Result of a create or edit workflow.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
  Saved(Marker),
  /// The geocoder confirmed zero candidates for the typed place. A
  /// user-correctable terminal state: nothing was saved, and coordinates
  /// are never defaulted.
  PlaceNotFound,
}

// ─── Orchestrator ────────────────────────────────────────────────────────────

/// Composes the collaborators into the user-facing workflows.
///
/// One instance per user session. Collaborators are injected; so is the
/// [`ActiveMarkerCache`], which this layer alone mutates.
pub struct Orchestrator<S, L, G, P> {
  markers:  S,
  visits:   L,
  geocoder: G,
  identity: P,
  cache:    ActiveMarkerCache,
  /// Marker ids with a geocode-then-save currently in flight. Edits to
  /// the same id are rejected until the first completes; different ids
  /// never contend. Session-local only — not a cross-session lock.
  in_flight: Mutex<HashSet<Uuid>>,
}

impl<S, L, G, P> Orchestrator<S, L, G, P>
where
  S: MarkerStore,
  L: VisitLedger,
  G: Geocoder,
  P: IdentityProvider,
{
  pub fn new(
    markers: S,
    visits: L,
    geocoder: G,
    identity: P,
    cache: ActiveMarkerCache,
  ) -> Self {
    Self {
      markers,
      visits,
      geocoder,
      identity,
      cache,
      in_flight: Mutex::new(HashSet::new()),
    }
  }

  /// The current viewer, if anyone is signed in.
  pub fn viewer(&self) -> Option<Session> {
    self.identity.current()
  }

  fn require_viewer(&self) -> Result<Session, FlowError> {
    self.identity.current().ok_or(FlowError::NotAuthenticated)
  }

  // ── Browsing ──────────────────────────────────────────────────────────────

  /// The signed-in user's own map.
  pub async fn browse_own_map(&self) -> Result<Vec<Marker>, FlowError> {
    let viewer = self.require_viewer()?;

    self
      .markers
      .list_by_owner(&viewer.email)
      .await
      .map_err(|e| {
        warn!(error = %e, "loading own map failed");
        FlowError::Failed(MSG_LOAD_MAP)
      })
  }

  /// Another user's map, by the identity typed into the search box.
  ///
  /// The marker fetch and the conditional visit record go out together;
  /// the fetch is mandatory, the record is best-effort and never gates
  /// display.
  pub async fn search_map(&self, target: &str) -> Result<SearchOutcome, FlowError> {
    let target = target.trim();
    if target.is_empty() {
      return Err(FlowError::InvalidInput("enter an email to search"));
    }

    let viewer = self.identity.current();
    let (listed, ()) = tokio::join!(
      self.markers.list_by_owner(target),
      self.record_visit_if_due(target, viewer.as_ref()),
    );

    let markers = listed.map_err(|e| {
      warn!(error = %e, target, "searching map failed");
      FlowError::Failed(MSG_LOAD_MAP)
    })?;

    if markers.is_empty() {
      Ok(SearchOutcome::Empty)
    } else {
      Ok(SearchOutcome::Loaded(markers))
    }
  }

  /// Append a visit when the policy says so: a known viewer looking at
  /// somebody else's map. Self-views and anonymous views record nothing.
  /// Ledger failures are logged and swallowed.
  async fn record_visit_if_due(&self, target: &str, viewer: Option<&Session>) {
    let Some(viewer) = viewer else { return };
    if viewer.email == target {
      return;
    }

    let draft = VisitDraft {
      visited:          target.to_string(),
      visitor:          viewer.email.clone(),
      credential_token: viewer.token.clone(),
    };
    if let Err(e) = self.visits.record(draft).await {
      warn!(error = %e, visited = target, "visit record dropped");
    }
  }

  /// The signed-in user's own visit audit trail, oldest first.
  pub async fn visit_log(&self) -> Result<Vec<Visit>, FlowError> {
    let viewer = self.require_viewer()?;

    self
      .visits
      .list_by_visited(&viewer.email)
      .await
      .map_err(|e| {
        warn!(error = %e, "loading visit log failed");
        FlowError::Failed(MSG_VISITS)
      })
  }

  // ── Create / edit ─────────────────────────────────────────────────────────

  /// Create a marker from a typed place name.
  ///
  /// Geocodes first; a marker is never submitted without a successful
  /// resolution, and a confirmed miss ends in
  /// [`SaveOutcome::PlaceNotFound`] with nothing saved.
  pub async fn create_marker(
    &self,
    place: &str,
    image_url: Option<String>,
  ) -> Result<SaveOutcome, FlowError> {
    let viewer = self.require_viewer()?;

    let coords = match self.geocode(place).await? {
      Some(c) => c,
      None => return Ok(SaveOutcome::PlaceNotFound),
    };

    let draft = MarkerDraft {
      place: place.trim().to_string(),
      lat: coords.lat,
      lon: coords.lon,
      owner: viewer.email,
      image_url,
    };
    let marker = self.markers.create(draft).await.map_err(|e| {
      warn!(error = %e, "creating marker failed");
      FlowError::Failed(MSG_SAVE)
    })?;

    Ok(SaveOutcome::Saved(marker))
  }

  /// Edit the place and/or image of marker `id`.
  ///
  /// A changed place re-runs the full geocode-then-save sequence exactly
  /// as in create; an image-only edit saves without geocoding. At most
  /// one such sequence may be in flight per marker id in this session.
  /// On success the cache slot holds the saved value, so the next screen
  /// needs no refetch.
  pub async fn edit_marker(
    &self,
    id: Uuid,
    new_place: Option<&str>,
    new_image: Option<String>,
  ) -> Result<SaveOutcome, FlowError> {
    self.require_viewer()?;
    let _guard = self.begin_save(id)?;

    let current = match self.load_marker(id).await? {
      Some(m) => m,
      None => return Err(FlowError::Failed(MSG_LOAD_MARKER)),
    };

    let mut patch = MarkerPatch::default();

    // A changed place drags fresh coordinates with it; the pair is never
    // split. Unchanged text keeps the stored pair, which already belongs
    // to that exact place value.
    if let Some(place) = new_place {
      let place = place.trim();
      if place.is_empty() {
        return Err(FlowError::InvalidInput("enter a place name"));
      }
      if place != current.place {
        let coords = match self.geocode(place).await? {
          Some(c) => c,
          None => return Ok(SaveOutcome::PlaceNotFound),
        };
        patch.place = Some(place.to_string());
        patch.lat = Some(coords.lat);
        patch.lon = Some(coords.lon);
      }
    }

    if let Some(url) = new_image {
      patch.image_url = Some(url);
    }

    if patch.is_empty() {
      return Err(FlowError::InvalidInput("nothing to change"));
    }

    let saved = self.markers.update(id, patch).await.map_err(|e| {
      warn!(error = %e, %id, "updating marker failed");
      FlowError::Failed(MSG_SAVE)
    })?;

    self.cache.set(saved.clone());
    Ok(SaveOutcome::Saved(saved))
  }

  /// Fold geocoder outcomes into the workflow's: empty input is the
  /// user's to fix, transport and parse failures surface as a failed
  /// state, and a confirmed miss is `None`.
  async fn geocode(&self, place: &str) -> Result<Option<Coordinates>, FlowError> {
    match self.geocoder.resolve(place).await {
      Ok(Resolution::Found(coords)) => Ok(Some(coords)),
      Ok(Resolution::NotFound) => Ok(None),
      Err(GeocodeError::EmptyQuery) => Err(FlowError::InvalidInput("enter a place name")),
      Err(e) => {
        warn!(error = %e, "geocoding failed");
        Err(FlowError::Failed(MSG_GEOCODE))
      }
    }
  }

  // ── View / delete ─────────────────────────────────────────────────────────

  /// Cache-first marker load. `None` is confirmed absence.
  pub async fn view_marker(&self, id: Uuid) -> Result<Option<Marker>, FlowError> {
    self.load_marker(id).await
  }

  /// Delete marker `id`. Deleting an already-deleted marker is success
  /// from the caller's perspective. On success, the cache is cleared iff
  /// it held this id; on failure, nothing changes.
  pub async fn delete_marker(&self, id: Uuid) -> Result<(), FlowError> {
    self.require_viewer()?;

    match self.markers.delete(id).await {
      Ok(()) | Err(StoreError::NotFound(_)) => {
        if let Some(cached) = self.cache.get()
          && cached.marker_id == id
        {
          self.cache.clear();
        }
        Ok(())
      }
      Err(e) => {
        warn!(error = %e, %id, "deleting marker failed");
        Err(FlowError::Failed(MSG_DELETE))
      }
    }
  }

  // ── Cache and affordances ─────────────────────────────────────────────────

  /// Select `marker` as the active one for the next screen.
  pub fn activate(&self, marker: Marker) {
    self.cache.set(marker);
  }

  /// Drop the navigation handoff. Called on logout and when returning to
  /// list contexts where a stale slot would be unsafe.
  pub fn clear_active_marker(&self) {
    self.cache.clear();
  }

  /// Whether edit/delete affordances should be offered for `marker`.
  ///
  /// A UI-level gate only — the backend must authorize mutations by
  /// owner identity independently.
  pub fn can_modify(&self, marker: &Marker) -> bool {
    self
      .identity
      .current()
      .is_some_and(|s| s.email == marker.owner)
  }

  // ── Internals ─────────────────────────────────────────────────────────────

  /// Cache-first load: a cached value with the wrong id is ignored, never
  /// surfaced; a fetched value repopulates the cache.
  async fn load_marker(&self, id: Uuid) -> Result<Option<Marker>, FlowError> {
    if let Some(cached) = self.cache.get()
      && cached.marker_id == id
    {
      return Ok(Some(cached));
    }

    let fetched = self.markers.get(id).await.map_err(|e| {
      warn!(error = %e, %id, "fetching marker failed");
      FlowError::Failed(MSG_LOAD_MARKER)
    })?;

    if let Some(marker) = &fetched {
      self.cache.set(marker.clone());
    }
    Ok(fetched)
  }

  fn begin_save(&self, id: Uuid) -> Result<FlightGuard<'_>, FlowError> {
    let mut set = self.in_flight.lock().expect("in-flight set poisoned");
    if !set.insert(id) {
      return Err(FlowError::SaveInFlight);
    }
    Ok(FlightGuard {
      set: &self.in_flight,
      id,
    })
  }
}

/// Clears the in-flight mark for a marker id when its workflow ends,
/// however it ends.
struct FlightGuard<'a> {
  set: &'a Mutex<HashSet<Uuid>>,
  id:  Uuid,
}

impl Drop for FlightGuard<'_> {
  fn drop(&mut self) {
    if let Ok(mut set) = self.set.lock() {
      set.remove(&self.id);
    }
  }
}
