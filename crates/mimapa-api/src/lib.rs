//! JSON REST API for the MiMapa backend.
//!
//! Exposes an axum [`Router`] backed by any [`MarkerStore`] +
//! [`VisitLedger`] implementation. Auth, TLS, and transport concerns are
//! the caller's responsibility. In particular, this layer does **not**
//! authorize marker mutations by owner identity — the client-side
//! edit/delete gate is an affordance, and a production deployment must
//! enforce ownership independently in front of these routes.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", mimapa_api::api_router(state.clone()))
//! ```

pub mod error;
pub mod markers;
pub mod media;
pub mod visits;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use mimapa_core::store::{MarkerStore, VisitLedger};

pub use error::ApiError;
pub use media::MediaBucket;

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S> {
  pub store: Arc<S>,
  pub media: MediaBucket,
  /// Externally-reachable base URL, used to mint durable media URLs.
  pub public_url: String,
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: MarkerStore + VisitLedger + Clone + Send + Sync + 'static,
{
  Router::new()
    // Markers
    .route(
      "/markers",
      get(markers::list::<S>).post(markers::create::<S>),
    )
    .route(
      "/markers/{id}",
      get(markers::get_one::<S>)
        .put(markers::update_one::<S>)
        .delete(markers::delete_one::<S>),
    )
    // Visits
    .route("/visits", get(visits::list::<S>).post(visits::create::<S>))
    // Media
    .route("/media", post(media::upload::<S>))
    .route("/media/{id}", get(media::serve::<S>))
    .with_state(state)
}
