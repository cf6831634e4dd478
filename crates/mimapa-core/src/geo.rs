//! Coordinates and the outcome of a place-name resolution.

use serde::{Deserialize, Serialize};

/// A WGS84 latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
  pub lat: f64,
  pub lon: f64,
}

/// What the geocoding provider had to say about a place name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
  /// The first candidate the provider returned. Providers may return many;
  /// the first is taken as the best guess — no ranking is applied.
  Found(Coordinates),

  /// The provider answered successfully with zero candidates. This is
  /// data ("no coordinates available"), not an error.
  NotFound,
}
