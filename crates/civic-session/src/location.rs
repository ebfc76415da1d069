//! Location providers.
//!
//! The hosting platform owns location permission. It answers with the user's
//! coordinates, or with nothing when location is unavailable or denied.

use civic_core::types::{Location, SessionId};

pub trait LocationProvider: Send + Sync {
    fn location(&self, session: SessionId) -> Option<Location>;
}

/// Always answers with the same coordinates.
pub struct FixedLocation(pub Location);

impl LocationProvider for FixedLocation {
    fn location(&self, _session: SessionId) -> Option<Location> {
        Some(self.0)
    }
}

/// Location is never available; every uncached request asks the user.
pub struct NoLocation;

impl LocationProvider for NoLocation {
    fn location(&self, _session: SessionId) -> Option<Location> {
        None
    }
}
