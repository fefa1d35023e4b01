use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{ReelError, Result};
use crate::location::Location;

const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GeneralConfig {
    /// Location opened on startup, e.g. `/movies?page=1`
    pub start: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

/// ~/.config/reel/config.toml (Linux) or ~/Library/Application Support/reel/config.toml (macOS)
pub fn config_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("reel").join("config.toml"))
}

impl Config {
    /// Load from `path`, or the default location when `None`. A missing file
    /// gives the defaults; a broken one gives the defaults and a warning.
    pub fn load(path: Option<&Path>) -> Self {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match config_path() {
                Some(p) => p,
                None => return Config::default(),
            },
        };

        let Ok(content) = std::fs::read_to_string(&path) else {
            return Config::default();
        };

        match Self::parse(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring config file");
                Config::default()
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| ReelError::Config(e.to_string()))?;
        if config.api.timeout_secs == 0 {
            return Err(ReelError::Config("api.timeout_secs must be at least 1".into()));
        }
        Ok(config)
    }

    pub fn start_location(&self) -> Location {
        self.general
            .start
            .as_deref()
            .map(Location::parse)
            .unwrap_or_default()
    }
}
