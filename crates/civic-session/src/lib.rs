//! Session layer for Civic.
//!
//! Remembers what each conversation has already resolved and drives the
//! location → district → official pipeline, consulting collaborators only for
//! the facts the session does not know yet.

pub mod error;
pub mod location;
pub mod machine;
pub mod orchestrator;
pub mod store;

pub use error::SessionError;
pub use location::{FixedLocation, LocationProvider, NoLocation};
pub use machine::{transition, Action, Request, Resolution, Stage};
pub use orchestrator::Orchestrator;
pub use store::{ContextStore, InMemoryContextStore, SessionRecord};
