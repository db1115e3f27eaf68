use serde::{Deserialize, Serialize};

/// A snapshot of a holder's registry, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    /// Watchers currently bound.
    pub live: usize,
    /// Keys handed out over the holder's lifetime.
    pub issued: u16,
    /// Keys still available before binds start failing.
    pub remaining: u16,
}
