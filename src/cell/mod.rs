//! Value storage shared between a holder and its watchers.
//!
//! - `access` concentrates the unchecked pointer and `UnsafeCell` operations.
//! - `slot` is the borrow-flagged cell that owns a holder's value.

pub(crate) mod access;
mod slot;

pub use slot::{Ref, RefMut};
pub(crate) use slot::ValueSlot;
