//! [`NominatimGeocoder`] — free-text place resolution against a
//! Nominatim-compatible search endpoint.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use mimapa_core::{
  error::GeocodeError,
  geo::{Coordinates, Resolution},
  store::Geocoder,
};

/// The public OpenStreetMap Nominatim search endpoint.
const PUBLIC_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";

/// One candidate in the provider's response array.
///
/// Nominatim serialises coordinates as strings; parsing happens on our
/// side, and only for the first candidate.
#[derive(Debug, Deserialize)]
struct Candidate {
  lat: String,
  lon: String,
}

/// Geocoder backed by a Nominatim-compatible HTTP endpoint.
///
/// Each call is an independent network round trip — no caching and no
/// rate limiting happen at this layer.
#[derive(Clone)]
pub struct NominatimGeocoder {
  client:   Client,
  endpoint: String,
}

impl NominatimGeocoder {
  /// A geocoder against the public OpenStreetMap endpoint.
  pub fn new() -> Result<Self, GeocodeError> {
    Self::with_endpoint(PUBLIC_ENDPOINT)
  }

  /// A geocoder against an arbitrary search endpoint. Tests point this at
  /// a local stub provider.
  pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self, GeocodeError> {
    let client = Client::builder()
      // Nominatim's usage policy requires an identifying user agent.
      .user_agent(concat!("mimapa/", env!("CARGO_PKG_VERSION")))
      .timeout(Duration::from_secs(30))
      .build()
      .map_err(|e| GeocodeError::Transport(format!("failed to build HTTP client: {e}")))?;

    Ok(Self {
      client,
      endpoint: endpoint.into(),
    })
  }
}

impl Geocoder for NominatimGeocoder {
  async fn resolve(&self, place: &str) -> Result<Resolution, GeocodeError> {
    let query = place.trim();
    if query.is_empty() {
      return Err(GeocodeError::EmptyQuery);
    }

    let resp = self
      .client
      .get(&self.endpoint)
      .query(&[("format", "json"), ("q", query)])
      .send()
      .await
      .map_err(|e| GeocodeError::Transport(e.to_string()))?;

    if !resp.status().is_success() {
      return Err(GeocodeError::Transport(format!(
        "provider responded with status {}",
        resp.status()
      )));
    }

    let candidates: Vec<Candidate> = resp
      .json()
      .await
      .map_err(|e| GeocodeError::Malformed(e.to_string()))?;

    // First candidate wins; the provider's own ordering is the ranking.
    let Some(first) = candidates.first() else {
      return Ok(Resolution::NotFound);
    };

    let lat: f64 = first
      .lat
      .parse()
      .map_err(|_| GeocodeError::Malformed(format!("non-numeric lat {:?}", first.lat)))?;
    let lon: f64 = first
      .lon
      .parse()
      .map_err(|_| GeocodeError::Malformed(format!("non-numeric lon {:?}", first.lon)))?;

    Ok(Resolution::Found(Coordinates { lat, lon }))
  }
}
