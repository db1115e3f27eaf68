//! Centralized unsafe accessors for the slot and watcher layers.
//!
//! Higher layers (`cell::slot`, `watch::*`) should not dereference raw pointers
//! or `UnsafeCell` contents ad hoc. They call the small, audited surface here so
//! every unchecked entry point is discoverable in one place.
//!
//! ## Core invariant
//! - Slot contents are initialized from construction until the owning slot drops.
//! - A pointer recorded in a holder registry or a watcher binding refers to a
//!   live, pinned object until the owner of that pointer is told otherwise
//!   (deregistration or invalidation).

use core::{cell::UnsafeCell, mem, ptr::NonNull};

/// Interprets the slot contents as `&T`.
///
/// # Safety
/// - No `&mut T` to the same contents may be live for `'a`.
#[inline(always)]
pub(crate) unsafe fn shared<'a, T>(cell: &'a UnsafeCell<T>) -> &'a T {
    // SAFETY: caller guarantees there is no outstanding exclusive reference.
    unsafe { &*cell.get() }
}

/// Interprets the slot contents as `&mut T`.
///
/// # Safety
/// - The returned reference must be the only reference to the contents for `'a`.
#[inline(always)]
#[allow(clippy::mut_from_ref)]
pub(crate) unsafe fn exclusive<'a, T>(cell: &'a UnsafeCell<T>) -> &'a mut T {
    // SAFETY: caller guarantees exclusivity.
    unsafe { &mut *cell.get() }
}

/// Swaps `value` into the slot and returns the previous contents.
///
/// # Safety
/// - No reference to the contents may be live during the call.
#[inline(always)]
pub(crate) unsafe fn swap_in<T>(cell: &UnsafeCell<T>, value: T) -> T {
    // SAFETY: caller guarantees no outstanding references.
    unsafe { mem::replace(&mut *cell.get(), value) }
}

/// Turns a recorded back-reference into a shared reference.
///
/// # Safety
/// - `ptr` must point at a live object for all of `'a`. For holders this is
///   guaranteed while the watcher's binding is set; for watchers while the
///   registry entry exists.
#[inline(always)]
pub(crate) unsafe fn linked<'a, U>(ptr: NonNull<U>) -> &'a U {
    // SAFETY: caller guarantees liveness of the pointee.
    unsafe { ptr.as_ref() }
}
