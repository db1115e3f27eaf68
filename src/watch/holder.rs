//! `Holder` — exclusive owner of a watched value.

use core::{
    cell::RefCell,
    fmt,
    marker::PhantomPinned,
    pin::Pin,
    ptr::NonNull,
};

use super::key::ViewerKey;
use super::registry::Registry;
use super::stats::RegistryStats;
use super::watcher::Watcher;
use crate::cell::{access, Ref, RefMut, ValueSlot};
use crate::error::{AccessError, BindError};
use crate::trace::trace_event;

/// Owns a value and tracks every [`Watcher`] bound to it.
///
/// A holder must be pinned before watchers can bind to it (see [`holder!`](crate::holder)
/// or `Box::pin`). While pinned it cannot move, and dropping it turns every
/// bound watcher invalid before the value is destroyed.
///
/// Moving an unpinned holder is an ordinary Rust move: no watcher can refer
/// to it yet.
pub struct Holder<T> {
    value: ValueSlot<T>,
    registry: RefCell<Registry<Watcher<T>>>,
    _pin: PhantomPinned,
}

impl<T> Holder<T> {
    /// Creates a holder owning `value`, with no watchers.
    pub fn new(value: T) -> Self {
        Self {
            value: ValueSlot::new(value),
            registry: RefCell::new(Registry::new()),
            _pin: PhantomPinned,
        }
    }

    /// Replaces the value in place.
    ///
    /// Bound watchers stay bound and observe the new value. (Named `assign`
    /// rather than `set` so it is not shadowed by `Pin::set` on pinned holders.)
    ///
    /// # Panics
    /// Panics if the value is currently borrowed.
    #[track_caller]
    pub fn assign(&self, value: T) {
        drop(self.value.replace(value));
    }

    /// Replaces the value in place, returning the previous one.
    ///
    /// # Panics
    /// Panics if the value is currently borrowed.
    #[track_caller]
    pub fn replace(&self, value: T) -> T {
        self.value.replace(value)
    }

    /// Replaces the value in place, returning the previous one.
    ///
    /// # Errors
    /// Fails without touching the value if it is currently borrowed.
    pub fn try_replace(&self, value: T) -> Result<T, AccessError> {
        self.value.try_replace(value)
    }

    /// Immutably borrows the value.
    ///
    /// # Panics
    /// Panics if the value is currently mutably borrowed.
    #[inline]
    #[track_caller]
    pub fn borrow(&self) -> Ref<'_, T> {
        self.value.borrow()
    }

    /// Mutably borrows the value.
    ///
    /// # Panics
    /// Panics if the value is currently borrowed.
    #[inline]
    #[track_caller]
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.value.borrow_mut()
    }

    /// Immutably borrows the value.
    ///
    /// # Errors
    /// Returns [`AccessError::AlreadyMutablyBorrowed`] if a mutable guard is alive.
    #[inline]
    pub fn try_borrow(&self) -> Result<Ref<'_, T>, AccessError> {
        self.value.try_borrow()
    }

    /// Mutably borrows the value.
    ///
    /// # Errors
    /// Fails if any guard on the value is alive.
    #[inline]
    pub fn try_borrow_mut(&self) -> Result<RefMut<'_, T>, AccessError> {
        self.value.try_borrow_mut()
    }

    /// Number of watchers currently bound to this holder.
    pub fn viewer_count(&self) -> usize {
        self.registry.borrow().len()
    }

    /// Returns `true` if `key` names a live registration of this holder.
    pub fn is_registered(&self, key: ViewerKey) -> bool {
        self.registry.borrow().contains(key)
    }

    /// Snapshot of the registry for diagnostics.
    pub fn stats(&self) -> RegistryStats {
        let registry = self.registry.borrow();
        let keys = registry.counter();
        RegistryStats {
            live: registry.len(),
            issued: keys.issued(),
            remaining: keys.remaining(),
        }
    }

    /// Moves the value out into a new, unpinned holder.
    ///
    /// Every watcher bound to `self` becomes invalid, since the slot it watched no
    /// longer holds the value. `self` stays alive holding `replacement` and can be
    /// watched again. The new holder starts with no watchers and continues the key
    /// sequence of `self`.
    ///
    /// # Panics
    /// Panics if the value is currently borrowed.
    #[track_caller]
    pub fn move_out(self: Pin<&mut Self>, replacement: T) -> Holder<T> {
        let this: &Self = &self;
        let moved = this.value.replace(replacement);
        this.invalidate_all();
        let keys = this.registry.borrow().counter();
        trace_event!(debug, issued = keys.issued(), "holder value moved out");
        Holder {
            value: ValueSlot::new(moved),
            registry: RefCell::new(Registry::with_counter(keys)),
            _pin: PhantomPinned,
        }
    }

    /// Moves the value out, leaving `T::default()` behind. See [`Holder::move_out`].
    ///
    /// # Panics
    /// Panics if the value is currently borrowed.
    #[track_caller]
    pub fn take(self: Pin<&mut Self>) -> Holder<T>
    where
        T: Default,
    {
        self.move_out(T::default())
    }

    /// Registers a watcher. Only called by [`Watcher`] from its own pinned address.
    pub(crate) fn add_viewer(&self, viewer: NonNull<Watcher<T>>) -> Result<ViewerKey, BindError> {
        let mut registry = self.registry.borrow_mut();
        match registry.insert(viewer) {
            Ok(key) => {
                trace_event!(trace, key = key.get(), live = registry.len(), "watcher bound");
                Ok(key)
            }
            Err(err) => {
                trace_event!(warn, %err, "watcher bind refused");
                Err(err)
            }
        }
    }

    /// Deregisters `key`. Absent keys are ignored.
    pub(crate) fn remove_viewer(&self, key: ViewerKey) {
        if self.registry.borrow_mut().remove(key) {
            trace_event!(trace, key = key.get(), "watcher unbound");
        }
    }

    /// Clears the registry, telling every watcher it is no longer bound.
    fn invalidate_all(&self) {
        let mut registry = self.registry.borrow_mut();
        trace_event!(debug, live = registry.len(), "invalidating watchers");
        for viewer in registry.drain() {
            // SAFETY: a registry entry exists only while its watcher is alive and
            // pinned; watchers deregister in `Drop` before their memory is reused.
            unsafe { access::linked(viewer) }.invalidate();
        }
    }
}

impl<T> Drop for Holder<T> {
    fn drop(&mut self) {
        if self.value.is_borrowed() {
            // A guard handed out through a watcher still points into this value.
            trace_event!(error, "holder dropped while its value is borrowed");
            std::process::abort();
        }
        self.invalidate_all();
    }
}

impl<T: Default> Default for Holder<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> From<T> for Holder<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Holder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Holder")
            .field("value", &self.value)
            .field("viewers", &self.viewer_count())
            .finish()
    }
}
