use thiserror::Error;

/// Top-level error type for the Civic workspace.
///
/// Subsystem crates define their own error types for the conditions they
/// classify and convert into `CivicError` where a failure crosses into the
/// composition root.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CivicError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Roster error: {0}")]
    Roster(String),

    #[error("Invalid location: latitude {latitude}, longitude {longitude}")]
    InvalidLocation { latitude: f64, longitude: f64 },

    #[error("Unknown chamber: {0}")]
    UnknownChamber(String),

    #[error("Lookup error: {0}")]
    Lookup(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for CivicError {
    fn from(err: toml::de::Error) -> Self {
        CivicError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for CivicError {
    fn from(err: toml::ser::Error) -> Self {
        CivicError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for CivicError {
    fn from(err: serde_json::Error) -> Self {
        CivicError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Civic operations.
pub type Result<T> = std::result::Result<T, CivicError>;
