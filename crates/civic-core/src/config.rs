use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{CivicError, Result};

/// Environment variable that overrides `lookup.api_key`.
pub const API_KEY_ENV: &str = "CIVIC_LOOKUP_API_KEY";

/// Top-level configuration for the Civic resolver.
///
/// Loaded from `~/.civic/config.toml` by default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CivicConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub lookup: LookupConfig,
    #[serde(default)]
    pub roster: RosterConfig,
}

impl CivicConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: CivicConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| CivicError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_api_key(std::env::var(API_KEY_ENV).ok());
    }

    fn apply_api_key(&mut self, key: Option<String>) {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.lookup.api_key = key;
        }
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Spatial lookup service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Base URL of the web API, without a trailing slash.
    pub base_url: String,
    /// API key sent as the `apiKey` query parameter.
    pub api_key: String,
    /// Referer header the key is registered against.
    pub referer: String,
    /// Feature table holding the district polygons.
    pub table: String,
    /// Attribute holding the house district code.
    pub house_field: String,
    /// Attribute holding the senate district code.
    pub senate_field: String,
    /// Spatial reference of the query point (WGS84).
    pub spatial_reference: u32,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.mapserv.utah.gov/api/v1".to_string(),
            api_key: String::new(),
            referer: "https://google.vote-skill.com".to_string(),
            table: "sgid10.political.officialslookup".to_string(),
            house_field: "repdist".to_string(),
            senate_field: "sendist".to_string(),
            spatial_reference: 4326,
            timeout_secs: 10,
        }
    }
}

/// Roster source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Path to the legislator roster JSON file.
    pub path: String,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            path: "~/.civic/legislators.json".to_string(),
        }
    }
}
