//! Resolution orchestrator: drives the state machine against real collaborators.
//!
//! Each step reads the session's context, asks [`transition`] what to do, and
//! writes whatever it derives back to the store before taking the next step.
//! A failure late in the pipeline therefore leaves the earlier facts cached.

use std::sync::Arc;

use civic_core::types::{ContextUpdate, Location, SessionId};
use civic_lookup::{DistrictResolver, ResolutionError};
use civic_roster::{match_pair, Roster};

use crate::error::SessionError;
use crate::location::LocationProvider;
use crate::machine::{transition, Action, Request, Resolution};
use crate::store::ContextStore;

/// Upper bound on steps per turn. A full resolution takes four.
const MAX_STEPS: usize = 6;

/// Coordinates the context store, location provider, district resolver and
/// roster for one request at a time.
pub struct Orchestrator {
    store: Arc<dyn ContextStore>,
    locations: Arc<dyn LocationProvider>,
    resolver: DistrictResolver,
    roster: Arc<Roster>,
}

impl Orchestrator {
    pub fn new(
        store: Arc<dyn ContextStore>,
        locations: Arc<dyn LocationProvider>,
        resolver: DistrictResolver,
        roster: Arc<Roster>,
    ) -> Self {
        Self {
            store,
            locations,
            resolver,
            roster,
        }
    }

    /// Answer one request for a session.
    ///
    /// Expected conditions (no location, no branch, vacant seat, lookup
    /// failure) come back as a [`Resolution`]; `Err` means the store failed.
    pub async fn handle(
        &self,
        session: SessionId,
        request: Request,
    ) -> Result<Resolution, SessionError> {
        tracing::debug!(session = %session, request = ?request, "Handling request");

        for _ in 0..MAX_STEPS {
            let context = self.store.get(session);
            let (action, update) = transition(&context, &request);
            self.store.set(session, update)?;

            match action {
                Action::Respond(resolution) => {
                    tracing::info!(
                        session = %session,
                        intent = %request.intent(),
                        outcome = resolution.kind(),
                        "Request resolved"
                    );
                    return Ok(resolution);
                }
                Action::AcquireLocation => match self.locations.location(session) {
                    Some(location) => {
                        tracing::debug!(session = %session, "Location acquired from provider");
                        self.store
                            .set(session, ContextUpdate::default().with_location(location))?;
                    }
                    None => {
                        tracing::debug!(session = %session, "No location available; asking user");
                        return Ok(Resolution::NeedLocation);
                    }
                },
                Action::ResolveDistricts(location) => {
                    match self.resolver.resolve_districts(location).await {
                        Ok(pair) => {
                            self.store
                                .set(session, ContextUpdate::default().with_districts(pair))?;
                        }
                        Err(error) => {
                            log_failure(session, &error);
                            return Ok(Resolution::Failed { error });
                        }
                    }
                }
                Action::MatchOfficials(pair) => {
                    let officials = match_pair(&self.roster, &pair).with_branch(request.branch());
                    self.store
                        .set(session, ContextUpdate::default().with_officials(officials))?;
                }
            }
        }

        tracing::error!(session = %session, "Resolution did not settle");
        Err(SessionError::Stalled(MAX_STEPS))
    }

    /// Re-run the request the session was last working on.
    pub async fn resume(&self, session: SessionId) -> Result<Resolution, SessionError> {
        let request = Request::resume(&self.store.get(session));
        self.handle(session, request).await
    }

    /// Record a location the user just granted, then resume the pending request.
    ///
    /// A session keeps the first location it learns; a later one is ignored.
    pub async fn provide_location(
        &self,
        session: SessionId,
        location: Location,
    ) -> Result<Resolution, SessionError> {
        if self.store.get(session).location.is_none() {
            self.store
                .set(session, ContextUpdate::default().with_location(location))?;
        } else {
            tracing::debug!(session = %session, "Session already has a location; keeping it");
        }
        self.resume(session).await
    }
}

fn log_failure(session: SessionId, error: &ResolutionError) {
    match error {
        ResolutionError::NoCoverage => {
            tracing::info!(session = %session, "Location is outside district coverage");
        }
        ResolutionError::ServiceError { status, message } => {
            tracing::warn!(
                session = %session,
                status = ?status,
                message = %message,
                "District lookup failed"
            );
        }
    }
}
