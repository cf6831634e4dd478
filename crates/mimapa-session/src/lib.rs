//! Orchestration layer for the MiMapa client.
//!
//! Composes the marker store, visit ledger, geocoder, and identity
//! collaborators into the user-facing workflows, and owns the single-slot
//! active-marker cache handed between navigation steps. Everything is
//! dependency-injected; this crate holds no ambient state.

mod cache;
mod orchestrator;

pub use cache::ActiveMarkerCache;
pub use orchestrator::{FlowError, Orchestrator, SaveOutcome, SearchOutcome};
