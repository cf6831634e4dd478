//! Session-held identity: the shell's implementation of the identity
//! capability.

use std::sync::{Arc, RwLock};

use mimapa_core::identity::{IdentityProvider, Session};

/// Identity holder mutated by the `login`/`logout` commands.
///
/// Cheap to clone — all clones share the same slot.
#[derive(Clone, Default)]
pub struct ShellIdentity {
  session: Arc<RwLock<Option<Session>>>,
}

impl ShellIdentity {
  pub fn new(initial: Option<Session>) -> Self {
    Self {
      session: Arc::new(RwLock::new(initial)),
    }
  }

  pub fn sign_in(&self, session: Session) {
    *self.session.write().expect("identity slot poisoned") = Some(session);
  }

  pub fn sign_out(&self) {
    *self.session.write().expect("identity slot poisoned") = None;
  }
}

impl IdentityProvider for ShellIdentity {
  fn current(&self) -> Option<Session> {
    self.session.read().expect("identity slot poisoned").clone()
  }
}
