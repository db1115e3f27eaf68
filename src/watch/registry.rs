//! The holder-side map from registration key to watcher back-reference.

use std::collections::HashMap;

use core::ptr::NonNull;

use super::key::{KeyCounter, ViewerKey};
use crate::error::BindError;

/// Live registrations of one holder.
///
/// Invariant: every entry points at a pinned watcher whose binding names this
/// registry's holder and the entry's key.
pub(crate) struct Registry<W> {
    entries: HashMap<ViewerKey, NonNull<W>>,
    keys: KeyCounter,
}

impl<W> Registry<W> {
    pub(crate) fn new() -> Self {
        Self::with_counter(KeyCounter::new())
    }

    /// Starts an empty registry that continues an existing key sequence.
    pub(crate) fn with_counter(keys: KeyCounter) -> Self {
        Self {
            entries: HashMap::new(),
            keys,
        }
    }

    /// Records `viewer` under a fresh key.
    pub(crate) fn insert(&mut self, viewer: NonNull<W>) -> Result<ViewerKey, BindError> {
        let key = self.keys.next_key().ok_or(BindError::KeysExhausted {
            issued: self.keys.issued(),
        })?;
        let prev = self.entries.insert(key, viewer);
        debug_assert!(prev.is_none(), "registration key {key} issued twice");
        Ok(key)
    }

    /// Erases `key`. Absent keys are ignored.
    pub(crate) fn remove(&mut self, key: ViewerKey) -> bool {
        self.entries.remove(&key).is_some()
    }

    pub(crate) fn contains(&self, key: ViewerKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn counter(&self) -> KeyCounter {
        self.keys
    }

    /// Empties the registry, yielding every recorded back-reference.
    pub(crate) fn drain(&mut self) -> impl Iterator<Item = NonNull<W>> + '_ {
        self.entries.drain().map(|(_, viewer)| viewer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_remove() {
        let mut a = 1;
        let mut b = 2;
        let mut registry = Registry::new();
        let ka = registry.insert(NonNull::from(&mut a)).unwrap();
        let kb = registry.insert(NonNull::from(&mut b)).unwrap();
        assert_ne!(ka, kb);
        assert_eq!(registry.len(), 2);

        assert!(registry.remove(ka));
        assert!(!registry.remove(ka));
        assert!(!registry.contains(ka));
        assert!(registry.contains(kb));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_keys_not_reused_after_removal() {
        let mut a = 0u8;
        let mut registry = Registry::new();
        let first = registry.insert(NonNull::from(&mut a)).unwrap();
        registry.remove(first);
        let second = registry.insert(NonNull::from(&mut a)).unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_drain_empties() {
        let mut a = 'a';
        let mut b = 'b';
        let mut registry = Registry::new();
        registry.insert(NonNull::from(&mut a)).unwrap();
        registry.insert(NonNull::from(&mut b)).unwrap();

        let mut seen: Vec<char> = registry.drain().map(|p| unsafe { *p.as_ptr() }).collect();
        seen.sort_unstable();
        assert_eq!(seen, ['a', 'b']);
        assert_eq!(registry.len(), 0);
        assert_eq!(registry.counter().issued(), 2);
    }

    #[test]
    fn test_continued_counter() {
        let mut a = 0u32;
        let mut keys = KeyCounter::new();
        keys.next_key();
        keys.next_key();
        let mut registry = Registry::with_counter(keys);
        assert_eq!(registry.insert(NonNull::from(&mut a)).unwrap().get(), 3);
    }

    #[test]
    fn test_exhausted_insert_fails() {
        let mut a = 0u32;
        let mut registry = Registry::with_counter(KeyCounter::new());
        for _ in 0..u16::MAX {
            let key = registry.insert(NonNull::from(&mut a)).unwrap();
            registry.remove(key);
        }
        assert_eq!(
            registry.insert(NonNull::from(&mut a)),
            Err(BindError::KeysExhausted { issued: u16::MAX })
        );
    }
}
