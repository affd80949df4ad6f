use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::units::{BandTable, ClockStyle};

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

pub const DEFAULT_GEOCODING_BASE_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_ICON_BASE_URL: &str = "https://openweathermap.org";

/// Top-level configuration stored on disk.
///
/// Every field has a default, so a partial file (or none at all) is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OpenWeather API key. `OPENWEATHER_API_KEY` wins over this value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    pub geocoding_base_url: String,
    pub weather_base_url: String,
    pub icon_base_url: String,

    /// Maximum number of suggestions requested from the geocoding endpoint.
    pub suggestion_limit: u8,

    /// Queries shorter than this (after trimming) never hit the network.
    pub min_query_len: usize,

    /// Quiet period between the last keystroke and the suggestion lookup.
    pub debounce_ms: u64,

    pub clock: ClockStyle,
    pub humidity_bands: BandTable,
    pub visibility_bands: BandTable,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            geocoding_base_url: DEFAULT_GEOCODING_BASE_URL.to_string(),
            weather_base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
            icon_base_url: DEFAULT_ICON_BASE_URL.to_string(),
            suggestion_limit: 5,
            min_query_len: 3,
            debounce_ms: 500,
            clock: ClockStyle::default(),
            humidity_bands: BandTable::humidity_default(),
            visibility_bands: BandTable::visibility_default(),
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "cityweather", "cityweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key.trim().to_string());
    }

    /// API key from the environment, falling back to the stored one.
    pub fn api_key(&self) -> Option<String> {
        resolve_api_key(std::env::var(API_KEY_ENV).ok(), self.api_key.as_deref())
    }

    pub fn require_api_key(&self) -> Result<String> {
        self.api_key().ok_or_else(|| {
            anyhow!(
                "No OpenWeather API key configured.\n\
                 Hint: run `cityweather configure` or set {API_KEY_ENV}."
            )
        })
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn resolve_api_key(from_env: Option<String>, stored: Option<&str>) -> Option<String> {
    from_env
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .or_else(|| stored.map(str::trim).filter(|key| !key.is_empty()).map(str::to_string))
}
