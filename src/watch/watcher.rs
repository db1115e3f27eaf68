//! `Watcher` — a non-owning handle that goes invalid when its holder dies.

use core::{
    cell::Cell,
    fmt,
    marker::PhantomPinned,
    pin::Pin,
    ptr::{self, NonNull},
};

use super::holder::Holder;
use super::key::ViewerKey;
use crate::cell::{access, Ref, RefMut};
use crate::error::{AccessError, BindError};

/// Where a bound watcher points, and the key it was registered under.
struct Binding<T> {
    holder: NonNull<Holder<T>>,
    key: ViewerKey,
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Binding<T> {}

/// A checkable reference to the value of a [`Holder`].
///
/// A watcher is either unbound or bound to one pinned holder. It becomes
/// unbound when [`reset`](Self::reset), when rebound elsewhere, or when the
/// holder is dropped or has its value moved out. The holder drives the last two
/// transitions; the watcher never polls.
///
/// Watchers are pinned for as long as they may be bound, since the holder
/// records their address. They cannot be cloned: each registration is a
/// distinct registry entry.
///
/// # Example
///
/// ```rust
/// use std::pin::pin;
/// use stackref::{Holder, Watcher};
///
/// let mut watcher = pin!(Watcher::new());
/// {
///     let holder = pin!(Holder::new(54325));
///     watcher.as_mut().bind(holder.as_ref());
///     assert_eq!(*watcher.borrow(), 54325);
/// }
/// assert!(!watcher.is_valid());
/// ```
pub struct Watcher<T> {
    binding: Cell<Option<Binding<T>>>,
    _pin: PhantomPinned,
}

impl<T> Watcher<T> {
    /// Creates an unbound watcher.
    pub const fn new() -> Self {
        Self {
            binding: Cell::new(None),
            _pin: PhantomPinned,
        }
    }

    /// Binds to `holder`, first leaving any holder this watcher is bound to.
    ///
    /// Binding always issues a fresh key, even when rebinding to the same holder.
    ///
    /// # Panics
    /// Panics if `holder` has exhausted its registration keys.
    #[track_caller]
    pub fn bind(self: Pin<&mut Self>, holder: Pin<&Holder<T>>) -> ViewerKey {
        match self.try_bind(holder) {
            Ok(key) => key,
            Err(err) => panic!("{err}"),
        }
    }

    /// Binds to `holder`, first leaving any holder this watcher is bound to.
    ///
    /// # Errors
    /// Returns [`BindError::KeysExhausted`] if `holder` cannot issue another key.
    /// The watcher is left unbound in that case.
    pub fn try_bind(self: Pin<&mut Self>, holder: Pin<&Holder<T>>) -> Result<ViewerKey, BindError> {
        let this = self.into_ref().get_ref();
        this.detach();
        let holder = holder.get_ref();
        let key = holder.add_viewer(NonNull::from(this))?;
        this.binding.set(Some(Binding {
            holder: NonNull::from(holder),
            key,
        }));
        Ok(key)
    }

    /// Binds to `holder` if it is `Some`, otherwise just leaves the current one.
    ///
    /// # Panics
    /// Panics if `holder` has exhausted its registration keys.
    #[track_caller]
    pub fn bind_opt(self: Pin<&mut Self>, holder: Option<Pin<&Holder<T>>>) -> Option<ViewerKey> {
        match self.try_bind_opt(holder) {
            Ok(key) => key,
            Err(err) => panic!("{err}"),
        }
    }

    /// Binds to `holder` if it is `Some`, otherwise just leaves the current one.
    ///
    /// # Errors
    /// Returns [`BindError::KeysExhausted`] if `holder` cannot issue another key.
    pub fn try_bind_opt(
        self: Pin<&mut Self>,
        holder: Option<Pin<&Holder<T>>>,
    ) -> Result<Option<ViewerKey>, BindError> {
        match holder {
            Some(holder) => self.try_bind(holder).map(Some),
            None => {
                self.reset();
                Ok(None)
            }
        }
    }

    /// Leaves the current holder. No-op when unbound.
    pub fn reset(self: Pin<&mut Self>) {
        self.into_ref().get_ref().detach();
    }

    /// Returns `true` while bound to a live holder.
    ///
    /// Check this (or use the `try_*` accessors) before reaching for the value.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.binding.get().is_some()
    }

    /// The key this watcher is registered under, if bound.
    #[inline]
    pub fn key(&self) -> Option<ViewerKey> {
        self.binding.get().map(|b| b.key)
    }

    /// Returns `true` if bound to exactly `holder`.
    pub fn is_bound_to(&self, holder: &Holder<T>) -> bool {
        self.binding
            .get()
            .is_some_and(|b| ptr::eq(b.holder.as_ptr(), holder))
    }

    /// Immutably borrows the watched value.
    ///
    /// # Errors
    /// Returns [`AccessError::Unbound`] if the watcher is not bound, or
    /// [`AccessError::AlreadyMutablyBorrowed`] if the value is being written.
    pub fn try_borrow(&self) -> Result<Ref<'_, T>, AccessError> {
        self.holder().ok_or(AccessError::Unbound)?.try_borrow()
    }

    /// Mutably borrows the watched value.
    ///
    /// # Errors
    /// Returns [`AccessError::Unbound`] if the watcher is not bound, or a borrow
    /// conflict error if any guard on the value is alive.
    pub fn try_borrow_mut(&self) -> Result<RefMut<'_, T>, AccessError> {
        self.holder().ok_or(AccessError::Unbound)?.try_borrow_mut()
    }

    /// Immutably borrows the watched value.
    ///
    /// # Panics
    /// Panics if the watcher is unbound or the value is mutably borrowed.
    #[track_caller]
    pub fn borrow(&self) -> Ref<'_, T> {
        match self.try_borrow() {
            Ok(guard) => guard,
            Err(err) => panic!("{err}"),
        }
    }

    /// Mutably borrows the watched value.
    ///
    /// # Panics
    /// Panics if the watcher is unbound or the value is borrowed.
    #[track_caller]
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        match self.try_borrow_mut() {
            Ok(guard) => guard,
            Err(err) => panic!("{err}"),
        }
    }

    /// Marks the watcher unbound. Called by the holder while it drops or
    /// moves its value out; the registry entry is discarded by the caller.
    pub(crate) fn invalidate(&self) {
        self.binding.set(None);
    }

    fn holder(&self) -> Option<&Holder<T>> {
        // SAFETY: the binding is set only while the holder is alive. The holder
        // clears it through `invalidate` before its memory can be reused, and
        // aborts rather than drop while a guard into its value is outstanding.
        self.binding.get().map(|b| unsafe { access::linked(b.holder) })
    }

    fn detach(&self) {
        if let Some(binding) = self.binding.take() {
            // SAFETY: see `holder`.
            unsafe { access::linked(binding.holder) }.remove_viewer(binding.key);
        }
    }
}

impl<T> Drop for Watcher<T> {
    fn drop(&mut self) {
        self.detach();
    }
}

impl<T> Default for Watcher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<&Watcher<T>> for bool {
    fn from(watcher: &Watcher<T>) -> bool {
        watcher.is_valid()
    }
}

impl<T> fmt::Debug for Watcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watcher")
            .field("valid", &self.is_valid())
            .field("key", &self.key())
            .finish()
    }
}
