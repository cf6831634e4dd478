//! Error types for `mimapa-core`.

use thiserror::Error;
use uuid::Uuid;

/// Failure modes shared by the marker store and the visit ledger.
#[derive(Debug, Error)]
pub enum StoreError {
  /// Bad local input, rejected before anything goes over the wire.
  #[error("invalid input: {0}")]
  Validation(String),

  #[error("record not found: {0}")]
  NotFound(Uuid),

  #[error("network error: {0}")]
  Network(String),

  #[error("backend responded with status {status}")]
  Backend { status: u16 },
}

/// Failure modes of free-text place resolution.
///
/// An empty candidate list is *not* represented here — see
/// [`Resolution::NotFound`](crate::geo::Resolution), which lets callers
/// retry transport errors without retrying a confirmed miss.
#[derive(Debug, Error)]
pub enum GeocodeError {
  /// Empty or whitespace-only place text, rejected without a network call.
  #[error("empty place text")]
  EmptyQuery,

  #[error("geocoding request failed: {0}")]
  Transport(String),

  #[error("malformed geocoding response: {0}")]
  Malformed(String),
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
