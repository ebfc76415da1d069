//! District resolution for Civic.
//!
//! Turns a coordinate pair into the house and senate districts covering it by
//! querying an external spatial search service, and classifies every failure
//! into a typed [`ResolutionError`].

pub mod client;
pub mod error;
pub mod resolver;

pub use client::{MapservClient, SpatialLookup, SpatialQuery};
pub use error::ResolutionError;
pub use resolver::{parse_districts, DistrictResolver};
