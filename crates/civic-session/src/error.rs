//! Error types for the session layer.
//!
//! Only infrastructure failures are errors here. Missing input, vacant seats,
//! disambiguation and spatial lookup failures are all returned as a
//! [`Resolution`](crate::machine::Resolution).

use civic_core::error::CivicError;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("storage error: {0}")]
    StorageError(String),
    #[error("resolution did not settle after {0} steps")]
    Stalled(usize),
}

impl From<SessionError> for CivicError {
    fn from(err: SessionError) -> Self {
        CivicError::Session(err.to_string())
    }
}
