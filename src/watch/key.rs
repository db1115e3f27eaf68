//! Registration keys issued by a holder to its watchers.

use core::num::NonZeroU16;

use serde::{Deserialize, Serialize};

/// The key a holder assigns to one bind operation.
///
/// Zero is never issued, so `Option<ViewerKey>` is the size of a `u16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewerKey(NonZeroU16);

impl ViewerKey {
    /// Returns the raw key value.
    #[inline(always)]
    pub const fn get(self) -> u16 {
        self.0.get()
    }
}

impl core::fmt::Display for ViewerKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic key source. Pre-increments, so the first key is 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct KeyCounter {
    issued: u16,
}

impl KeyCounter {
    pub(crate) const fn new() -> Self {
        Self { issued: 0 }
    }

    /// Issues the next key, or `None` once every `u16` key has been handed out.
    pub(crate) fn next_key(&mut self) -> Option<ViewerKey> {
        let next = self.issued.checked_add(1)?;
        self.issued = next;
        NonZeroU16::new(next).map(ViewerKey)
    }

    pub(crate) const fn issued(&self) -> u16 {
        self.issued
    }

    pub(crate) const fn remaining(&self) -> u16 {
        u16::MAX - self.issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_key_is_one() {
        let mut keys = KeyCounter::new();
        assert_eq!(keys.next_key().map(ViewerKey::get), Some(1));
        assert_eq!(keys.next_key().map(ViewerKey::get), Some(2));
        assert_eq!(keys.issued(), 2);
    }

    #[test]
    fn test_exhaustion_is_sticky() {
        let mut keys = KeyCounter { issued: u16::MAX - 1 };
        assert_eq!(keys.next_key().map(ViewerKey::get), Some(u16::MAX));
        assert_eq!(keys.remaining(), 0);
        assert_eq!(keys.next_key(), None);
        assert_eq!(keys.next_key(), None);
        assert_eq!(keys.issued(), u16::MAX);
    }

    #[test]
    fn test_key_niche() {
        assert_eq!(core::mem::size_of::<Option<ViewerKey>>(), core::mem::size_of::<u16>());
    }
}
