//! Legislator matching.
//!
//! Picks the senator and representative for a district pair, then narrows a
//! selection to one official when the user asks about a specific chamber.

use serde::{Deserialize, Serialize};

use civic_core::types::{Chamber, DistrictPair, Legislator, OfficialsSelection};

use crate::roster::Roster;

/// Result of narrowing a selection to one chamber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpecificMatch {
    Found {
        chamber: Chamber,
        legislator: Legislator,
    },
    /// The seat for this chamber is vacant or missing from the roster.
    NotFound { chamber: Chamber },
    /// No chamber was requested; the user has to say which one.
    DisambiguationNeeded,
}

/// Select the senator and representative for a district pair.
///
/// Scans the roster once. The first entry matching each seat wins; a seat with
/// no entry is left as `None`. The returned selection carries no requested
/// branch.
pub fn match_pair(roster: &Roster, pair: &DistrictPair) -> OfficialsSelection {
    let mut senator = None;
    let mut representative = None;

    for legislator in roster.iter() {
        if legislator.district != pair.district(legislator.house) {
            continue;
        }
        let seat = match legislator.house {
            Chamber::Senate => &mut senator,
            Chamber::House => &mut representative,
        };
        if seat.is_none() {
            *seat = Some(legislator.clone());
        }
        if senator.is_some() && representative.is_some() {
            break;
        }
    }

    tracing::debug!(
        senate_district = %pair.senate_district,
        house_district = %pair.house_district,
        senator = senator.is_some(),
        representative = representative.is_some(),
        "Matched district pair against roster"
    );

    OfficialsSelection {
        senator,
        representative,
        requested_branch: None,
    }
}

/// Narrow a selection to the official for `requested_branch`.
///
/// Never guesses: with no branch the answer is `DisambiguationNeeded`.
pub fn match_specific(
    selection: &OfficialsSelection,
    requested_branch: Option<Chamber>,
) -> SpecificMatch {
    let Some(chamber) = requested_branch else {
        return SpecificMatch::DisambiguationNeeded;
    };

    match selection.get(chamber) {
        Some(legislator) => SpecificMatch::Found {
            chamber,
            legislator: legislator.clone(),
        },
        None => SpecificMatch::NotFound { chamber },
    }
}
