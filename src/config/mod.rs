//! Configuration management for chapel.
//!
//! Configuration is read from `~/.config/chapel/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.
//! The `SANITY_*` environment variables override the `[cms]` section.

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_VERSION: &str = "2023-12-01";
pub const DEFAULT_DATASET: &str = "production";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub cms: CmsConfig,
    pub site: SiteConfig,
    pub scheduler: SchedulerConfig,
}

/// Connection settings for the headless CMS.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CmsConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    /// Query the edge cache instead of the live API
    pub use_cdn: bool,
    /// Request timeout in seconds (default: 10)
    pub timeout_secs: u64,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            dataset: DEFAULT_DATASET.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            use_cdn: false,
            timeout_secs: 10,
        }
    }
}

impl CmsConfig {
    pub fn is_configured(&self) -> bool {
        !self.project_id.trim().is_empty() && !self.dataset.trim().is_empty()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Details about the parish used in generated links and texts.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub name: String,
    pub location: String,
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "King's Palace Parish".to_string(),
            location: "King's Palace Parish, RCCG Sweden".to_string(),
            base_url: "http://localhost:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Refresh period after the first midnight, e.g. "24h" (default: 24h)
    pub period: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            period: "24h".to_string(),
        }
    }
}

impl SchedulerConfig {
    pub fn period(&self) -> Result<Duration, ConfigError> {
        parse_interval(&self.period)
            .map(Duration::from_secs)
            .map_err(ConfigError::Invalid)
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from `path` and apply environment overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Override `[cms]` values with `SANITY_PROJECT_ID`, `SANITY_DATASET`
    /// and `SANITY_API_VERSION`. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(project_id) = lookup("SANITY_PROJECT_ID") {
            self.cms.project_id = project_id;
        }
        if let Some(dataset) = lookup("SANITY_DATASET") {
            self.cms.dataset = dataset;
        }
        if let Some(api_version) = lookup("SANITY_API_VERSION") {
            self.cms.api_version = api_version;
        }
    }

    /// Get the default config file path: `~/.config/chapel/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("chapel").join("config.toml"))
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        tracing::info!("Created default config at {}", path.display());
        Ok(())
    }

    /// Generate the default config file content with comments.
    pub fn default_config_content() -> String {
        r##"# chapel configuration
#
# The [cms] values can also be provided through the environment:
# SANITY_PROJECT_ID, SANITY_DATASET, SANITY_API_VERSION

[cms]
# Sanity project id (required to fetch any content)
project_id = ""
dataset = "production"
api_version = "2023-12-01"

# Query the API CDN instead of the live API
use_cdn = false

# Request timeout in seconds
timeout_secs = 10

[site]
# Used in calendar entries and share links
name = "King's Palace Parish"
location = "King's Palace Parish, RCCG Sweden"
base_url = "http://localhost:3000"

[scheduler]
# How often to refresh after the first midnight ("24h", "12h", "1d", ...)
period = "24h"
"##
        .to_string()
    }
}

/// Parse interval string like "1h", "30m", "6h", "1d" into seconds
pub fn parse_interval(s: &str) -> Result<u64, String> {
    let s = s.trim().to_lowercase();

    let secs = if let Some(hours) = s.strip_suffix('h') {
        hours
            .parse::<u64>()
            .map(|h| h * 3600)
            .map_err(|_| format!("Invalid hours: {}", hours))
    } else if let Some(minutes) = s.strip_suffix('m') {
        minutes
            .parse::<u64>()
            .map(|m| m * 60)
            .map_err(|_| format!("Invalid minutes: {}", minutes))
    } else if let Some(days) = s.strip_suffix('d') {
        days.parse::<u64>()
            .map(|d| d * 86400)
            .map_err(|_| format!("Invalid days: {}", days))
    } else if let Some(secs) = s.strip_suffix('s') {
        secs.parse::<u64>()
            .map_err(|_| format!("Invalid seconds: {}", secs))
    } else {
        s.parse::<u64>()
            .map_err(|_| format!("Invalid interval: {}. Use format like '24h', '30m', '1d'", s))
    }?;

    if secs == 0 {
        return Err("Interval must be greater than zero".to_string());
    }
    Ok(secs)
}

/// Format interval for display
pub fn format_interval(secs: u64) -> String {
    if secs >= 86400 && secs.is_multiple_of(86400) {
        format!("{}d", secs / 86400)
    } else if secs >= 3600 && secs.is_multiple_of(3600) {
        format!("{}h", secs / 3600)
    } else if secs >= 60 && secs.is_multiple_of(60) {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration value: {0}")]
    Invalid(String),
}
