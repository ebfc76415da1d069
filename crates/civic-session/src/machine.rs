//! Resolution state machine.
//!
//! A pure step function from the session's context and the current request
//! to the next action, plus the context writes the request itself implies.
//!
//! Stages, most-derived first:
//! - `HaveOfficials` -> respond from the cached selection
//! - `HaveDistricts` -> match the roster
//! - `HaveLocation`  -> resolve districts
//! - `Start`         -> acquire a location (or ask the user for one)

use serde::{Deserialize, Serialize};

use civic_core::types::{
    Chamber, ContextUpdate, DistrictPair, Intent, Legislator, Location, OfficialsSelection,
    SessionContext,
};
use civic_lookup::ResolutionError;
use civic_roster::{match_specific, SpecificMatch};

/// What the user asked for this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Both legislators for the user's districts.
    Mine,
    /// One legislator; `branch` is `None` when the user did not say which.
    Details { branch: Option<Chamber> },
}

impl Request {
    pub fn intent(&self) -> Intent {
        match self {
            Request::Mine => Intent::Mine,
            Request::Details { .. } => Intent::Details,
        }
    }

    pub fn branch(&self) -> Option<Chamber> {
        match self {
            Request::Mine => None,
            Request::Details { branch } => *branch,
        }
    }

    /// Rebuild the request a session was last working on.
    pub fn resume(context: &SessionContext) -> Self {
        match context.last_intent {
            Some(Intent::Details) => Request::Details {
                branch: context.last_requested_branch,
            },
            Some(Intent::Mine) | None => Request::Mine,
        }
    }
}

/// How far a session's cached facts reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Start,
    HaveLocation,
    HaveDistricts,
    HaveOfficials,
}

impl Stage {
    pub fn of(context: &SessionContext) -> Self {
        if context.officials.is_some() {
            Stage::HaveOfficials
        } else if context.district_pair.is_some() {
            Stage::HaveDistricts
        } else if context.location.is_some() {
            Stage::HaveLocation
        } else {
            Stage::Start
        }
    }
}

/// Final answer for one turn, handed to the rendering collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    Officials {
        officials: OfficialsSelection,
    },
    Official {
        chamber: Chamber,
        legislator: Legislator,
    },
    /// The requested seat has no legislator in the roster.
    Vacant {
        chamber: Chamber,
    },
    NeedLocation,
    NeedBranch,
    Failed {
        error: ResolutionError,
    },
}

impl Resolution {
    pub fn kind(&self) -> &'static str {
        match self {
            Resolution::Officials { .. } => "officials",
            Resolution::Official { .. } => "official",
            Resolution::Vacant { .. } => "vacant",
            Resolution::NeedLocation => "need_location",
            Resolution::NeedBranch => "need_branch",
            Resolution::Failed { .. } => "failed",
        }
    }
}

/// Next thing the driver has to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Respond(Resolution),
    MatchOfficials(DistrictPair),
    ResolveDistricts(Location),
    AcquireLocation,
}

/// Decide the next action for `request` given what the session already knows.
///
/// The returned update always records the request's intent, and its branch
/// when it names one. When a cached selection is narrowed to a branch, the
/// selection is rewritten with that branch.
pub fn transition(context: &SessionContext, request: &Request) -> (Action, ContextUpdate) {
    let mut update = ContextUpdate::default()
        .with_intent(request.intent())
        .with_branch(request.branch());

    let action = match Stage::of(context) {
        Stage::HaveOfficials => {
            let officials = context.officials.clone().unwrap_or_default();
            match request {
                Request::Mine => Action::Respond(Resolution::Officials {
                    officials: officials.with_branch(None),
                }),
                Request::Details { branch } => {
                    let branch = branch
                        .or(context.last_requested_branch)
                        .or(officials.requested_branch);

                    if branch.is_some() && officials.requested_branch != branch {
                        update = update.with_officials(officials.clone().with_branch(branch));
                    }

                    Action::Respond(match match_specific(&officials, branch) {
                        SpecificMatch::Found {
                            chamber,
                            legislator,
                        } => Resolution::Official {
                            chamber,
                            legislator,
                        },
                        SpecificMatch::NotFound { chamber } => Resolution::Vacant { chamber },
                        SpecificMatch::DisambiguationNeeded => Resolution::NeedBranch,
                    })
                }
            }
        }
        Stage::HaveDistricts => match &context.district_pair {
            Some(pair) => Action::MatchOfficials(pair.clone()),
            None => Action::AcquireLocation,
        },
        Stage::HaveLocation => match context.location {
            Some(location) => Action::ResolveDistricts(location),
            None => Action::AcquireLocation,
        },
        Stage::Start => Action::AcquireLocation,
    };

    (action, update)
}
