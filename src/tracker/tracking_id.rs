use std::fmt;

use serde::Deserialize;

/// Identity of a physically tracked body within one sensor session.
///
/// The sensor assigns and reuses these; zero means "no body".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize)]
#[serde(transparent)]
pub struct TrackingId(u64);

impl TrackingId {
    /// Sentinel for an untracked body.
    pub const NONE: TrackingId = TrackingId(0);

    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for TrackingId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TrackingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
