pub mod config;
pub mod error;
pub mod types;

pub use config::CivicConfig;
pub use error::{CivicError, Result};
pub use types::*;
