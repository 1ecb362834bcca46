//! ID types for emitters.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Global counter for emitter IDs.
static EMITTER_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier for an emitter, used to tag log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EmitterId(u64);

impl EmitterId {
    /// Creates a new unique emitter ID.
    #[must_use]
    pub fn new() -> Self {
        Self(EMITTER_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Creates an emitter ID from a raw value.
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl Default for EmitterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EmitterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "emitter#{}", self.0)
    }
}
