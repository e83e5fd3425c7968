//! Arena owning every pass, with deferred hash recomputation
//!
//! Mutable access marks a pass dirty; its sort hash is refreshed only when
//! [`PassStore::process_pending_updates`] runs. Passes queued for deletion stay
//! alive until the same batch point so outstanding render queue entries never
//! see a dangling key mid-frame.

use std::collections::BTreeSet;

use slotmap::SlotMap;

use crate::foundation::collections::PassKey;
use crate::material::pass::Pass;

/// Owner of all passes
#[derive(Debug, Clone, Default)]
pub struct PassStore {
    passes: SlotMap<PassKey, Pass>,
    dirty: BTreeSet<PassKey>,
    graveyard: Vec<PassKey>,
}

impl PassStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pass; it starts out dirty
    pub fn insert(&mut self, pass: Pass) -> PassKey {
        let key = self.passes.insert(pass);
        self.dirty.insert(key);
        key
    }

    /// Borrow a pass
    pub fn get(&self, key: PassKey) -> Option<&Pass> {
        self.passes.get(key)
    }

    /// Mutably borrow a pass, scheduling a hash refresh
    pub fn get_mut(&mut self, key: PassKey) -> Option<&mut Pass> {
        let pass = self.passes.get_mut(key)?;
        self.dirty.insert(key);
        Some(pass)
    }

    /// Copy a pass into a new slot
    pub fn duplicate(&mut self, key: PassKey) -> Option<PassKey> {
        let pass = self.passes.get(key)?.clone();
        Some(self.insert(pass))
    }

    /// Schedule a pass for destruction at the next batch point
    pub fn queue_for_deletion(&mut self, key: PassKey) {
        self.dirty.remove(&key);
        if self.passes.contains_key(key) && !self.graveyard.contains(&key) {
            self.graveyard.push(key);
        }
    }

    /// True when the hash of this pass is stale
    pub fn is_dirty(&self, key: PassKey) -> bool {
        self.dirty.contains(&key)
    }

    /// Number of passes with stale hashes
    pub fn dirty_count(&self) -> usize {
        self.dirty.len()
    }

    /// Number of passes awaiting destruction
    pub fn pending_deletions(&self) -> usize {
        self.graveyard.len()
    }

    /// Destroy queued passes, then refresh every stale hash
    pub fn process_pending_updates(&mut self) {
        for key in self.graveyard.drain(..) {
            self.passes.remove(key);
        }

        let dirty = std::mem::take(&mut self.dirty);
        let refreshed = dirty.len();
        for key in dirty {
            if let Some(pass) = self.passes.get_mut(key) {
                pass.recalculate_hash();
            }
        }
        log::trace!("Refreshed {} pass hashes", refreshed);
    }

    /// Number of live passes, including those queued for deletion
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// True when the store holds no passes
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::TextureUnitState;

    #[test]
    fn test_hash_is_deferred_until_batch() {
        let mut store = PassStore::new();
        let key = store.insert(Pass::new());
        store.process_pending_updates();
        let initial = store.get(key).unwrap().hash();

        store
            .get_mut(key)
            .unwrap()
            .add_texture_unit(TextureUnitState::with_texture("grass.png"));
        assert!(store.is_dirty(key));
        assert_eq!(store.get(key).unwrap().hash(), initial);

        store.process_pending_updates();
        assert!(!store.is_dirty(key));
        assert_ne!(store.get(key).unwrap().hash(), initial);
    }

    #[test]
    fn test_deletion_removes_from_dirty_set() {
        let mut store = PassStore::new();
        let key = store.insert(Pass::new());
        store.queue_for_deletion(key);
        store.queue_for_deletion(key);

        assert!(!store.is_dirty(key));
        assert_eq!(store.pending_deletions(), 1);
        assert!(store.get(key).is_some());

        store.process_pending_updates();
        assert!(store.get(key).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_duplicate_is_independent() {
        let mut store = PassStore::new();
        let key = store.insert(Pass::new());
        let copy = store.duplicate(key).unwrap();
        store.get_mut(copy).unwrap().set_lighting_enabled(false);
        assert!(store.get(key).unwrap().lighting_enabled());
        assert_eq!(store.len(), 2);
    }
}
