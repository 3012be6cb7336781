//! Application configuration loading and defaults.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

const CONFIG_DIR: &str = "openrev";
const CONFIG_FILE: &str = "config.toml";

/// Template written on first run. Credentials are left for the user.
const DEFAULT_CONFIG: &str = r#"# openrev configuration

[api]
base_url = "https://api2.openreview.net"
# OpenReview account credentials, read once at startup.
username = ""
password = ""
# Per-request timeout in seconds.
timeout_secs = 30

[venue]
venue_id = "ICLR.cc/2025/Conference"
venue_filter = "ICLR.cc/2025"
accepted_venues = [
  "ICLR 2025 Poster",
  "ICLR 2025 Spotlight",
  "ICLR 2025 Oral",
]

[export]
data_dir = "data"
file_label = "ICLR2025"
"#;

/// Remote API connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the OpenReview API.
    pub base_url: String,
    /// Account username, usually an email address.
    pub username: String,
    /// Account password.
    pub password: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api2.openreview.net".to_string(),
            username: String::new(),
            password: String::new(),
            timeout_secs: 30,
        }
    }
}

/// Venue selection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueConfig {
    /// Main venue harvested by `--main`.
    pub venue_id: String,
    /// Substring used to filter the venue listing and find workshops.
    pub venue_filter: String,
    /// Venue labels that count a submission as accepted.
    pub accepted_venues: Vec<String>,
}

impl Default for VenueConfig {
    fn default() -> Self {
        Self {
            venue_id: "ICLR.cc/2025/Conference".to_string(),
            venue_filter: "ICLR.cc/2025".to_string(),
            accepted_venues: vec![
                "ICLR 2025 Poster".to_string(),
                "ICLR 2025 Spotlight".to_string(),
                "ICLR 2025 Oral".to_string(),
            ],
        }
    }
}

/// Export location settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory the JSON exports are written into.
    pub data_dir: PathBuf,
    /// Prefix used in export file names.
    pub file_label: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            file_label: "ICLR2025".to_string(),
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote API settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Venue selection settings.
    #[serde(default)]
    pub venue: VenueConfig,
    /// Export location settings.
    #[serde(default)]
    pub export: ExportConfig,
}

impl AppConfig {
    /// Load configuration from the user config file plus `OPENREV`
    /// environment overrides, falling back to defaults for absent keys.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file_path()?)
    }

    fn load_from(path: &Path) -> Result<Self> {
        let defaults =
            Config::try_from(&AppConfig::default()).context("failed to encode default config")?;
        let settings = Config::builder()
            .add_source(defaults)
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("OPENREV").separator("__"))
            .build()
            .with_context(|| format!("failed to read config {}", path.display()))?;
        settings
            .try_deserialize()
            .with_context(|| format!("failed to parse config {}", path.display()))
    }
}

/// Path to the user-level config file.
pub fn config_file_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("failed to locate the user config directory")?;
    Ok(base.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Write the commented default config if none exists yet.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = config_file_path()?;
    if !path.exists() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&path, DEFAULT_CONFIG)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(path)
}
