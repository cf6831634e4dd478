//! Marker — a persisted record of a visited place.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;

/// A place pinned on a user's personal map.
///
/// `lat`/`lon` are always the geocoding result for the current `place`
/// text as of the last successful save; they are only ever updated as a
/// pair, alongside `place`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
  /// Store-assigned; immutable after creation.
  pub marker_id: Uuid,
  /// Human-readable place name, as typed by the owner.
  pub place:     String,
  pub lat:       f64,
  pub lon:       f64,
  /// Identity of the creating user; immutable after creation.
  pub owner:     String,
  /// Durable URL to an illustrative image, if one was uploaded.
  pub image_url: Option<String>,
}

/// Input to [`MarkerStore::create`](crate::store::MarkerStore::create).
/// `marker_id` is always assigned by the store; it is not accepted from
/// callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerDraft {
  pub place:     String,
  pub lat:       f64,
  pub lon:       f64,
  pub owner:     String,
  pub image_url: Option<String>,
}

impl MarkerDraft {
  /// Local validation, run before the draft goes anywhere near the wire.
  pub fn validate(&self) -> Result<(), StoreError> {
    if self.place.trim().is_empty() {
      return Err(StoreError::Validation("place must not be empty".into()));
    }
    if self.owner.trim().is_empty() {
      return Err(StoreError::Validation("owner must not be empty".into()));
    }
    if !self.lat.is_finite() || !self.lon.is_finite() {
      return Err(StoreError::Validation(
        "coordinates must be finite numbers".into(),
      ));
    }
    Ok(())
  }
}

/// Partial update for [`MarkerStore::update`](crate::store::MarkerStore::update).
///
/// A caller changing `place` must supply `lat` and `lon` in the same
/// patch. The orchestration layer enforces that; the store only applies
/// whatever fields are present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarkerPatch {
  pub place:     Option<String>,
  pub lat:       Option<f64>,
  pub lon:       Option<f64>,
  pub image_url: Option<String>,
}

impl MarkerPatch {
  pub fn is_empty(&self) -> bool {
    self.place.is_none()
      && self.lat.is_none()
      && self.lon.is_none()
      && self.image_url.is_none()
  }

  /// Apply the present fields to `marker`, leaving the rest untouched.
  pub fn apply(&self, marker: &mut Marker) {
    if let Some(place) = &self.place {
      marker.place = place.clone();
    }
    if let Some(lat) = self.lat {
      marker.lat = lat;
    }
    if let Some(lon) = self.lon {
      marker.lon = lon;
    }
    if let Some(url) = &self.image_url {
      marker.image_url = Some(url.clone());
    }
  }
}
