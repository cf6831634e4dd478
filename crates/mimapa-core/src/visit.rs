//! Visit — an append-only audit record of one identity viewing another's
//! map.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One view of `visited`'s marker set by `visitor`.
///
/// Visits are never mutated or deleted by this layer, and repeated views
/// each append a fresh row — the audit trail is intentionally not
/// deduplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
  pub visit_id:         Uuid,
  /// Owner of the map that was viewed.
  pub visited:          String,
  /// Identity that performed the view.
  pub visitor:          String,
  /// Opaque session token of the visitor, stored verbatim for audit
  /// display. Never validated here.
  pub credential_token: String,
  /// Ledger-assigned creation time; immutable.
  pub timestamp:        DateTime<Utc>,
}

/// Input to [`VisitLedger::record`](crate::store::VisitLedger::record).
/// `visit_id` and `timestamp` are always assigned by the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitDraft {
  pub visited:          String,
  pub visitor:          String,
  pub credential_token: String,
}
