//! `ValueSlot` — single-threaded runtime borrow checking for watched values.
//!
//! A holder's value is reachable from the holder itself and from every bound
//! watcher, so the aliasing rules cannot be checked statically. The slot keeps a
//! borrow counter next to the value and hands out RAII guards.

mod guards;

pub use guards::{Ref, RefMut};

use core::cell::{Cell, UnsafeCell};

use crate::cell::access;
use crate::error::AccessError;

// Borrow counter states: positive = readers, `WRITING` = one writer, zero = free.
const UNUSED: isize = 0;
const WRITING: isize = -1;

/// A borrow-checked storage slot for a single value.
pub struct ValueSlot<T> {
    pub(super) borrow: Cell<isize>,
    pub(super) value: UnsafeCell<T>,
}

impl<T> ValueSlot<T> {
    /// Creates a new slot containing `value`.
    #[inline(always)]
    pub const fn new(value: T) -> Self {
        Self {
            borrow: Cell::new(UNUSED),
            value: UnsafeCell::new(value),
        }
    }

    /// Returns `true` if any guard is outstanding.
    #[inline(always)]
    pub fn is_borrowed(&self) -> bool {
        self.borrow.get() != UNUSED
    }

    /// Immutably borrows the value.
    ///
    /// # Errors
    /// Returns [`AccessError::AlreadyMutablyBorrowed`] if a [`RefMut`] is alive.
    #[inline]
    pub fn try_borrow(&self) -> Result<Ref<'_, T>, AccessError> {
        let current = self.borrow.get();
        if current < UNUSED {
            return Err(AccessError::AlreadyMutablyBorrowed);
        }
        assert!(current < isize::MAX, "too many shared borrows");
        self.borrow.set(current + 1);
        Ok(Ref { slot: self })
    }

    /// Mutably borrows the value.
    ///
    /// # Errors
    /// Returns [`AccessError::AlreadyBorrowed`] or
    /// [`AccessError::AlreadyMutablyBorrowed`] if any guard is alive.
    #[inline]
    pub fn try_borrow_mut(&self) -> Result<RefMut<'_, T>, AccessError> {
        match self.borrow.get() {
            UNUSED => {
                self.borrow.set(WRITING);
                Ok(RefMut { slot: self })
            }
            WRITING => Err(AccessError::AlreadyMutablyBorrowed),
            _ => Err(AccessError::AlreadyBorrowed),
        }
    }

    /// Immutably borrows the value.
    ///
    /// # Panics
    /// Panics if the value is currently mutably borrowed.
    #[inline]
    #[track_caller]
    pub fn borrow(&self) -> Ref<'_, T> {
        match self.try_borrow() {
            Ok(guard) => guard,
            Err(err) => panic!("{err}"),
        }
    }

    /// Mutably borrows the value.
    ///
    /// # Panics
    /// Panics if the value is currently borrowed.
    #[inline]
    #[track_caller]
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        match self.try_borrow_mut() {
            Ok(guard) => guard,
            Err(err) => panic!("{err}"),
        }
    }

    /// Replaces the value, returning the previous one.
    ///
    /// # Errors
    /// Fails without touching the slot if any guard is alive.
    pub fn try_replace(&self, value: T) -> Result<T, AccessError> {
        let guard = self.try_borrow_mut()?;
        // SAFETY: the write guard proves no other reference to the contents exists,
        // and the guard itself is not dereferenced during the swap.
        let old = unsafe { access::swap_in(&self.value, value) };
        drop(guard);
        Ok(old)
    }

    /// Replaces the value, returning the previous one.
    ///
    /// # Panics
    /// Panics if the value is currently borrowed.
    #[track_caller]
    pub fn replace(&self, value: T) -> T {
        match self.try_replace(value) {
            Ok(old) => old,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for ValueSlot<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut d = f.debug_struct("ValueSlot");
        match self.try_borrow() {
            Ok(value) => d.field("value", &*value),
            Err(_) => d.field("value", &format_args!("<borrowed>")),
        };
        d.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_borrows_stack() {
        let slot = ValueSlot::new(7);
        let a = slot.borrow();
        let b = slot.borrow();
        assert_eq!(*a + *b, 14);
        assert!(slot.is_borrowed());
        assert_eq!(slot.try_borrow_mut().err(), Some(AccessError::AlreadyBorrowed));
        drop(a);
        drop(b);
        assert!(!slot.is_borrowed());
    }

    #[test]
    fn test_exclusive_borrow_blocks_everything() {
        let slot = ValueSlot::new(String::from("a"));
        {
            let mut w = slot.borrow_mut();
            w.push('b');
            assert_eq!(slot.try_borrow_mut().err(), Some(AccessError::AlreadyMutablyBorrowed));
            assert_eq!(slot.try_borrow().err(), Some(AccessError::AlreadyMutablyBorrowed));
            assert_eq!(slot.try_replace(String::new()).err(), Some(AccessError::AlreadyMutablyBorrowed));
        }
        assert_eq!(&*slot.borrow(), "ab");
    }

    #[test]
    fn test_replace_returns_previous() {
        let slot = ValueSlot::new(1);
        assert_eq!(slot.replace(2), 1);
        assert_eq!(*slot.borrow(), 2);
    }

    #[test]
    #[should_panic(expected = "already borrowed")]
    fn test_replace_while_reading_panics() {
        let slot = ValueSlot::new(1);
        let _r = slot.borrow();
        slot.replace(2);
    }

    #[test]
    fn test_debug_reports_borrowed() {
        let slot = ValueSlot::new(3);
        assert_eq!(format!("{slot:?}"), "ValueSlot { value: 3 }");
        let _w = slot.borrow_mut();
        assert_eq!(format!("{slot:?}"), "ValueSlot { value: <borrowed> }");
    }
}
