use core::ops::{Deref, DerefMut};

use crate::cell::access;

use super::{ValueSlot, UNUSED, WRITING};

/// Shared borrow guard for a watched value.
pub struct Ref<'a, T> {
    pub(super) slot: &'a ValueSlot<T>,
}

impl<T> Deref for Ref<'_, T> {
    type Target = T;

    #[inline(always)]
    fn deref(&self) -> &T {
        // SAFETY: `Ref` exists only while the reader count is positive, and a
        // `RefMut` requires the count to be zero.
        unsafe { access::shared(&self.slot.value) }
    }
}

impl<T> Drop for Ref<'_, T> {
    fn drop(&mut self) {
        let prev = self.slot.borrow.get();
        debug_assert!(prev > UNUSED, "borrow count underflow");
        self.slot.borrow.set(prev - 1);
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for Ref<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(&**self, f)
    }
}

/// Exclusive borrow guard for a watched value.
pub struct RefMut<'a, T> {
    pub(super) slot: &'a ValueSlot<T>,
}

impl<T> Deref for RefMut<'_, T> {
    type Target = T;

    #[inline(always)]
    fn deref(&self) -> &T {
        // SAFETY: `RefMut` exists only in the `WRITING` state.
        unsafe { access::shared(&self.slot.value) }
    }
}

impl<T> DerefMut for RefMut<'_, T> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: `RefMut` exists only in the `WRITING` state, and `&mut self`
        // keeps the returned reference unique.
        unsafe { access::exclusive(&self.slot.value) }
    }
}

impl<T> Drop for RefMut<'_, T> {
    fn drop(&mut self) {
        debug_assert_eq!(self.slot.borrow.get(), WRITING, "expected writer borrow state");
        self.slot.borrow.set(UNUSED);
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for RefMut<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(&**self, f)
    }
}
