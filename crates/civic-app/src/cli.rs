//! CLI argument definitions for the Civic application.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use civic_core::error::Result;
use civic_core::types::{Chamber, Location};

/// Civic: find the state legislators who represent a location.
#[derive(Parser, Debug)]
#[command(name = "civic", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Path to the legislator roster JSON file.
    #[arg(short = 'r', long = "roster", global = true)]
    pub roster: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Show the senator and representative for a location.
    Who {
        #[command(flatten)]
        at: Coordinates,
    },
    /// Show one legislator for a location.
    Details {
        #[command(flatten)]
        at: Coordinates,
        /// Chamber to show (senate or house).
        #[arg(short = 'b', long = "branch")]
        branch: Option<Chamber>,
    },
    /// Count seats per chamber.
    Count,
    /// Party breakdown of the whole roster.
    Stats,
    /// Write a default configuration file.
    Init {
        /// Overwrite an existing file.
        #[arg(long = "force")]
        force: bool,
    },
}

/// Optional coordinate pair. Omitting both simulates a user without location.
#[derive(Args, Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees.
    #[arg(long = "lat", requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude in decimal degrees.
    #[arg(long = "lon", requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,
}

impl Coordinates {
    /// Validated location, or `None` when no coordinates were given.
    pub fn location(&self) -> Result<Option<Location>> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Location::new(lat, lon).map(Some),
            _ => Ok(None),
        }
    }
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > CIVIC_CONFIG env var > ~/.civic/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("CIVIC_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the roster path.
    ///
    /// Priority: --roster flag > config file value (with `~` expanded).
    pub fn resolve_roster_path(&self, config_path: &str) -> PathBuf {
        match self.roster {
            Some(ref p) => p.clone(),
            None => expand_home(config_path),
        }
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(".civic").join("config.toml"),
        None => PathBuf::from("config.toml"),
    }
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
