//! HTTP implementations of the MiMapa collaborator traits.
//!
//! [`ApiClient`] speaks to the marker backend's JSON API and implements
//! [`MarkerStore`](mimapa_core::store::MarkerStore),
//! [`VisitLedger`](mimapa_core::store::VisitLedger), and
//! [`MediaStore`](mimapa_core::store::MediaStore).
//! [`NominatimGeocoder`] wraps the external place-name search provider.

mod backend;
mod geocode;

pub use backend::{ApiClient, ApiConfig};
pub use geocode::NominatimGeocoder;
