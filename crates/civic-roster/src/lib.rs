//! Legislator roster for Civic.
//!
//! Loads the static roster of legislators, matches a district pair to its
//! senator and representative, and computes read-only roster statistics.

pub mod matcher;
pub mod roster;
pub mod stats;

pub use matcher::{match_pair, match_specific, SpecificMatch};
pub use roster::Roster;
pub use stats::{chamber_counts, party_stats, ChamberCounts, PartyPercentages, PartyStats};
