//! Holder/watcher registration protocol.
//!
//! A [`Holder`] owns a value and keeps a registry of every bound [`Watcher`],
//! keyed by a per-holder [`ViewerKey`]. Each side keeps the other consistent:
//!
//! - binding registers the watcher and records `(holder, key)` in it;
//! - resetting, rebinding or dropping a watcher erases its registry entry;
//! - dropping a holder, or moving its value out, invalidates every entry.
//!
//! After every public operation, each registry entry points at a live watcher
//! whose binding names that holder and that key, and vice versa.
//!
//! The registration hooks (`add_viewer`, `remove_viewer`, `invalidate`) are
//! crate-private; only this module's two types call them.

mod holder;
mod key;
mod registry;
mod stats;
mod watcher;

pub use holder::Holder;
pub use key::ViewerKey;
pub use stats::RegistryStats;
pub use watcher::Watcher;
