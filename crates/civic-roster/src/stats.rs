//! Read-only roster statistics: seats per chamber and party breakdown.

use serde::{Deserialize, Serialize};

use civic_core::types::{Chamber, Party};

use crate::roster::Roster;

/// Number of legislators in each chamber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChamberCounts {
    pub senators: usize,
    pub representatives: usize,
}

impl ChamberCounts {
    pub fn total(&self) -> usize {
        self.senators + self.representatives
    }
}

/// Number of legislators per party.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyStats {
    pub democrats: usize,
    pub republicans: usize,
    pub other: usize,
}

/// Party shares in percent, each in `0.0..=100.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartyPercentages {
    pub democrats: f64,
    pub republicans: f64,
    pub other: f64,
}

impl PartyStats {
    pub fn total(&self) -> usize {
        self.democrats + self.republicans + self.other
    }

    /// Percentage breakdown, or `None` when there is nobody to count.
    pub fn percentages(&self) -> Option<PartyPercentages> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let share = |count: usize| count as f64 / total as f64 * 100.0;
        Some(PartyPercentages {
            democrats: share(self.democrats),
            republicans: share(self.republicans),
            other: share(self.other),
        })
    }
}

pub fn chamber_counts(roster: &Roster) -> ChamberCounts {
    roster
        .iter()
        .fold(ChamberCounts::default(), |mut counts, legislator| {
            match legislator.house {
                Chamber::Senate => counts.senators += 1,
                Chamber::House => counts.representatives += 1,
            }
            counts
        })
}

pub fn party_stats(roster: &Roster) -> PartyStats {
    roster
        .iter()
        .fold(PartyStats::default(), |mut stats, legislator| {
            match legislator.party {
                Party::Democrat => stats.democrats += 1,
                Party::Republican => stats.republicans += 1,
                Party::Other(_) => stats.other += 1,
            }
            stats
        })
}
