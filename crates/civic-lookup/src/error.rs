//! Error types for district resolution.

use civic_core::error::CivicError;
use serde::{Deserialize, Serialize};

/// Why a location could not be resolved to districts.
///
/// A classification only; turning it into something a user hears is the
/// caller's job.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionError {
    /// Transport failure, non-success reply, or a payload that does not have
    /// the expected shape.
    #[error("Spatial service error: {message}")]
    ServiceError {
        status: Option<u16>,
        message: String,
    },
    /// The service answered, but no district covers the point.
    #[error("Location is outside district coverage")]
    NoCoverage,
}

impl ResolutionError {
    pub fn service(status: Option<u16>, message: impl Into<String>) -> Self {
        ResolutionError::ServiceError {
            status,
            message: message.into(),
        }
    }
}

impl From<ResolutionError> for CivicError {
    fn from(err: ResolutionError) -> Self {
        CivicError::Lookup(err.to_string())
    }
}
