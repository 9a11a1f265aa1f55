use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{model::Coordinates, provider::weatherapi::DEFAULT_BASE_URL, settings::Settings};

/// Environment variable that overrides the configured API key.
pub const API_KEY_ENV: &str = "WEATHERAPI_KEY";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// How `--here` resolves the current position.
///
/// In TOML this is `"ip"`, `"off"` or a fixed `{ lat = .., lon = .. }` table.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "GeolocationSetting", into = "GeolocationSetting")]
pub enum GeolocationMode {
    /// Ask WeatherAPI.com where the public IP is.
    #[default]
    Ip,
    Off,
    Fixed(Coordinates),
}

/// On-disk spelling of [`GeolocationMode`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum GeolocationSetting {
    Keyword(String),
    Position(Coordinates),
}

impl TryFrom<GeolocationSetting> for GeolocationMode {
    type Error = String;

    fn try_from(value: GeolocationSetting) -> Result<Self, Self::Error> {
        match value {
            GeolocationSetting::Position(position) => Ok(GeolocationMode::Fixed(position)),
            GeolocationSetting::Keyword(keyword) => match keyword.trim().to_lowercase().as_str() {
                "ip" => Ok(GeolocationMode::Ip),
                "off" => Ok(GeolocationMode::Off),
                other => Err(format!(
                    "unknown geolocation mode '{other}', expected \"ip\", \"off\" or {{ lat, lon }}"
                )),
            },
        }
    }
}

impl From<GeolocationMode> for GeolocationSetting {
    fn from(mode: GeolocationMode) -> Self {
        match mode {
            GeolocationMode::Ip => GeolocationSetting::Keyword("ip".into()),
            GeolocationMode::Off => GeolocationSetting::Keyword("off".into()),
            GeolocationMode::Fixed(position) => GeolocationSetting::Position(position),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// geolocation = { lat = 59.33, lon = 18.07 }
///
/// [display]
/// tempUnit = "F"
/// autoRefresh = "15min"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_key: Option<String>,

    /// Override for tests or proxies; defaults to the public endpoint.
    pub base_url: Option<String>,

    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub geolocation: GeolocationMode,

    /// Unit and refresh preferences the session starts with. The persisted
    /// default location, when there is one, takes precedence over
    /// `display.defaultLocation`.
    #[serde(default)]
    pub display: Settings,
}

impl Config {
    /// API key from the environment, else from the file.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone())
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
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
        let dirs = ProjectDirs::from("dev", "weatherdash", "weatherdash")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
