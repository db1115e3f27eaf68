//! # `stackref` - Self-Invalidating Watchers for Scope-Owned Values
//!
//! A [`Holder`] owns a value whose lifetime is tied to a lexical scope (or any
//! other non-shared storage). A [`Watcher`] is a non-owning handle to that value
//! that can always answer "is my holder still alive?" and only hands out the
//! value when it is.
//!
//! No reference counting or garbage collection is involved: the holder is the
//! single owner, and the two sides maintain a registry of back-references.
//!
//! ## Safety Model
//!
//! - **Pinned endpoints**: holders and watchers record each other's addresses,
//!   so both are `!Unpin` and must be pinned before binding. The pin drop
//!   guarantee ensures each side's `Drop` runs before its memory is reused.
//! - **Holder-driven invalidation**: dropping a holder (or moving its value
//!   out) invalidates every bound watcher before the value is destroyed.
//! - **Runtime borrow flags**: the value is reachable from several handles, so
//!   access goes through [`Ref`]/[`RefMut`] guards with single-threaded borrow
//!   counting. A holder dropped while a guard is outstanding aborts the process.
//! - **Thread confinement**: neither type is `Send` or `Sync`.
//!
//! ## Example
//!
//! ```rust
//! use stackref::{holder, watch, Watcher};
//! use std::pin::pin;
//!
//! let mut b = pin!(Watcher::new());
//! {
//!     holder!(a = 54325);
//!     b.as_mut().bind(a.as_ref());
//!     {
//!         watch!(d => a.as_ref());
//!         assert_eq!(a.viewer_count(), 2);
//!     }
//!     assert_eq!(a.viewer_count(), 1);
//!
//!     a.assign(12);
//!     assert_eq!(*b.borrow(), 12);
//! }
//! assert!(!b.is_valid());
//! assert!(b.try_borrow().is_err());
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

mod trace;

pub(crate) mod cell;
pub mod error;
mod macros;
pub mod watch;

pub use cell::{Ref, RefMut};
pub use error::{AccessError, BindError};
pub use watch::{Holder, RegistryStats, ViewerKey, Watcher};

// Compile-time layout checks.
const _: () = {
    use core::mem;

    // Key 0 is never issued, so an unbound key costs nothing.
    assert!(mem::size_of::<Option<ViewerKey>>() == mem::size_of::<u16>());

    // A watcher is one back-pointer plus a key; stay within a few words.
    assert!(mem::size_of::<Watcher<u64>>() <= mem::size_of::<usize>() * 2);
};
