//! Per-object flags and the engine-wide menu flag.

use std::collections::HashMap;

use crate::widget::ObjectId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectFlags {
    /// The host asked for no sounds from this object.
    pub sound_disabled: bool,
    /// Last hidden state seen when evaluating a window-state change.
    pub was_hidden: bool,
}

/// Flags attached to source objects, keyed by identity.
///
/// Entries are created on first write and live until [`ObjectStateStore::forget`]
/// is called for them. Reading an unknown object yields default flags.
#[derive(Debug, Default)]
pub struct ObjectStateStore {
    flags: HashMap<ObjectId, ObjectFlags>,
}

impl ObjectStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ObjectId) -> ObjectFlags {
        self.flags.get(&id).copied().unwrap_or_default()
    }

    pub fn is_sound_disabled(&self, id: ObjectId) -> bool {
        self.get(id).sound_disabled
    }

    pub fn set_sound_disabled(&mut self, id: ObjectId, disabled: bool) {
        self.flags.entry(id).or_default().sound_disabled = disabled;
    }

    pub fn was_hidden(&self, id: ObjectId) -> bool {
        self.get(id).was_hidden
    }

    /// Stores the new hidden state and returns the previous one.
    pub fn replace_was_hidden(&mut self, id: ObjectId, hidden: bool) -> bool {
        let entry = self.flags.entry(id).or_default();
        std::mem::replace(&mut entry.was_hidden, hidden)
    }

    pub fn forget(&mut self, id: ObjectId) -> bool {
        self.flags.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn clear(&mut self) {
        self.flags.clear();
    }
}

/// State the dispatch table carries between records.
///
/// There is a single menu flag for all menu chains: two unrelated menus open
/// at once share it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DispatchState {
    pub menu_popped_up: bool,
}

impl DispatchState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_object_has_default_flags() {
        let store = ObjectStateStore::new();
        assert_eq!(store.get(ObjectId(9)), ObjectFlags::default());
        assert!(store.is_empty());
    }

    #[test]
    fn test_flags_are_independent() {
        let mut store = ObjectStateStore::new();
        store.set_sound_disabled(ObjectId(1), true);

        assert!(store.is_sound_disabled(ObjectId(1)));
        assert!(!store.was_hidden(ObjectId(1)));

        let previous = store.replace_was_hidden(ObjectId(1), true);
        assert!(!previous);
        assert!(store.was_hidden(ObjectId(1)));
        assert!(store.is_sound_disabled(ObjectId(1)));
    }

    #[test]
    fn test_replace_returns_previous_value() {
        let mut store = ObjectStateStore::new();
        assert!(!store.replace_was_hidden(ObjectId(2), true));
        assert!(store.replace_was_hidden(ObjectId(2), false));
        assert!(!store.was_hidden(ObjectId(2)));
    }

    #[test]
    fn test_forget_removes_entry() {
        let mut store = ObjectStateStore::new();
        store.set_sound_disabled(ObjectId(3), true);
        assert_eq!(store.len(), 1);

        assert!(store.forget(ObjectId(3)));
        assert!(!store.forget(ObjectId(3)));
        assert!(!store.is_sound_disabled(ObjectId(3)));
    }
}
