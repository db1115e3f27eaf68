//! Error types for binding watchers and accessing watched values.

use core::fmt;

/// The error returned when a watcher cannot be registered with a holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindError {
    /// The holder has issued every registration key it can represent.
    ///
    /// Keys are never reused, so a holder that has accepted `issued` binds over
    /// its lifetime refuses any further ones.
    KeysExhausted {
        /// Number of keys the holder has handed out.
        issued: u16,
    },
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeysExhausted { issued } => {
                write!(f, "holder has exhausted its registration keys ({issued} issued)")
            }
        }
    }
}

impl std::error::Error for BindError {}

/// The error returned by the fallible value accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessError {
    /// The watcher is not bound to a live holder.
    Unbound,
    /// A shared borrow is outstanding, so exclusive access was refused.
    AlreadyBorrowed,
    /// An exclusive borrow is outstanding, so no borrow can be taken.
    AlreadyMutablyBorrowed,
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unbound => "watcher is not bound to a live holder",
            Self::AlreadyBorrowed => "already borrowed",
            Self::AlreadyMutablyBorrowed => "already mutably borrowed",
        })
    }
}

impl std::error::Error for AccessError {}
