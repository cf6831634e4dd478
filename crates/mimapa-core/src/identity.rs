//! The identity capability — "current identity, or none".

use serde::{Deserialize, Serialize};

/// The signed-in user as reported by the authentication collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  /// Email-like identifier; doubles as the marker owner key.
  pub email: String,
  /// Opaque credential token, recorded verbatim on visits.
  pub token: String,
}

/// Read-only view of the authentication collaborator.
///
/// Login and logout flows live outside this layer; the only question it
/// ever answers is "who, if anyone, is signed in right now".
pub trait IdentityProvider: Send + Sync {
  fn current(&self) -> Option<Session>;
}
