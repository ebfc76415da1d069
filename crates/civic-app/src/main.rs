//! Civic application binary - composition root.
//!
//! Ties together all Civic crates into a single executable:
//! 1. Load configuration from TOML (plus env overrides)
//! 2. Load the legislator roster
//! 3. Build the spatial client, district resolver and session store
//! 4. Run one request through the orchestrator and print the outcome as JSON

mod cli;

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use serde_json::{json, Value};

use civic_core::config::CivicConfig;
use civic_core::error::{CivicError, Result as CivicResult};
use civic_core::types::{Location, SessionId};
use civic_lookup::{DistrictResolver, MapservClient};
use civic_roster::{chamber_counts, party_stats, Roster};
use civic_session::{
    FixedLocation, InMemoryContextStore, LocationProvider, NoLocation, Orchestrator, Request,
};

use cli::{CliArgs, Command};

/// Wire the pipeline for a single invocation.
fn build_orchestrator(
    config: &CivicConfig,
    store: Arc<InMemoryContextStore>,
    roster: Roster,
    location: Option<Location>,
) -> CivicResult<Orchestrator> {
    let client = Arc::new(MapservClient::new(&config.lookup)?);
    let resolver = DistrictResolver::new(client, &config.lookup);

    let locations: Arc<dyn LocationProvider> = match location {
        Some(location) => Arc::new(FixedLocation(location)),
        None => Arc::new(NoLocation),
    };

    Ok(Orchestrator::new(store, locations, resolver, Arc::new(roster)))
}

/// Write the default configuration to `path`.
fn init_config(path: &Path, force: bool) -> CivicResult<Value> {
    if path.exists() && !force {
        return Err(CivicError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    CivicConfig::default().save(path)?;
    Ok(json!({ "written": path.display().to_string() }))
}

/// Seats per chamber.
fn count_report(roster: &Roster) -> Value {
    let counts = chamber_counts(roster);
    json!({
        "senators": counts.senators,
        "representatives": counts.representatives,
        "total": counts.total(),
    })
}

/// Chamber counts plus party counts and shares.
fn stats_report(roster: &Roster) -> Value {
    let parties = party_stats(roster);
    json!({
        "chambers": chamber_counts(roster),
        "parties": parties,
        "percentages": parties.percentages(),
    })
}

/// Execute one command.
async fn run(
    command: Command,
    config: &CivicConfig,
    config_path: &Path,
    roster_path: &Path,
) -> Result<Value, Box<dyn std::error::Error>> {
    let (at, request) = match command {
        Command::Init { force } => return Ok(init_config(config_path, force)?),
        Command::Count => return Ok(count_report(&Roster::load(roster_path)?)),
        Command::Stats => return Ok(stats_report(&Roster::load(roster_path)?)),
        Command::Who { at } => (at, Request::Mine),
        Command::Details { at, branch } => (at, Request::Details { branch }),
    };

    let roster = Roster::load(roster_path)?;
    let store = Arc::new(InMemoryContextStore::new());
    let orchestrator = build_orchestrator(config, Arc::clone(&store), roster, at.location()?)?;

    let session = SessionId::new();
    let resolution = orchestrator.handle(session, request).await?;

    if let Some(record) = store.record(session) {
        tracing::debug!(
            session = %session,
            created_at = %record.created_at.to_datetime(),
            updated_at = %record.updated_at.to_datetime(),
            "Session record"
        );
    }

    Ok(serde_json::to_value(&resolution)?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config. Read before the configured log level is known, so load
    // warnings go through a stderr-only bootstrap subscriber.
    let config_file = args.resolve_config_path();
    let bootstrap = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::WARN)
        .finish();
    let mut config = tracing::subscriber::with_default(bootstrap, || {
        CivicConfig::load_or_default(&config_file)
    });
    config.apply_env();

    // Tracing. Logs go to stderr so stdout stays valid JSON.
    let level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level)),
        )
        .init();

    tracing::info!("Starting Civic v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration resolved");
    if config.lookup.api_key.is_empty() {
        tracing::warn!("No lookup API key configured; district lookups will be rejected");
    }

    let roster_path = args.resolve_roster_path(&config.roster.path);
    let output = run(args.command, &config, &config_file, &roster_path).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
