//! The single-slot, navigation-spanning marker cache.

use std::sync::{Arc, Mutex};

use mimapa_core::marker::Marker;

/// At most one "active" marker, shared across navigation steps.
///
/// A transient handoff, not a source of truth: any consumer that needs
/// guaranteed freshness must re-fetch from the store by id. Last write
/// wins; there is no versioning and no expiry. Cloning is cheap — all
/// clones share the same slot.
#[derive(Clone, Default)]
pub struct ActiveMarkerCache {
  slot: Arc<Mutex<Option<Marker>>>,
}

impl ActiveMarkerCache {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self) -> Option<Marker> {
    self.slot.lock().expect("cache slot poisoned").clone()
  }

  pub fn set(&self, marker: Marker) {
    *self.slot.lock().expect("cache slot poisoned") = Some(marker);
  }

  pub fn clear(&self) {
    *self.slot.lock().expect("cache slot poisoned") = None;
  }
}
