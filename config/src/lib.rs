//! Configuration loading for ceprace.
//!
//! Reads `~/.ceprace/config.toml` (or the file named by `CEPRACE_CONFIG`).
//! Every field is optional; a missing file means built-in defaults.
//!
//! ```toml
//! [timeouts]
//! request_ms = 1000
//! race_ms = 1000
//! secondary_ms = 1000
//!
//! [sources.brasilapi]
//! base_url = "https://brasilapi.com.br/api/cep/v1/"
//!
//! [sources.viacep]
//! base_url = "https://viacep.com.br/ws/"
//! suffix = "/json/"
//! ```
//!
//! [`RaceConfig`] is the resolved form used by the engine: concrete durations and
//! one [`Endpoint`](ceprace_types::Endpoint) per source, no `Option`s.

mod resolved;

pub use resolved::{
    BRASILAPI_BASE_URL, DEFAULT_TIMEOUT, RaceConfig, VIACEP_BASE_URL, VIACEP_SUFFIX,
};

use serde::Deserialize;
use std::{
    env, fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use toml::de::Error as TomlError;

use ceprace_types::Source;

/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "CEPRACE_CONFIG";

/// Sets all three timeouts at once, in milliseconds.
pub const TIMEOUT_ENV: &str = "CEPRACE_TIMEOUT_MS";

#[derive(Debug, Default, Deserialize)]
pub struct CepraceConfig {
    pub timeouts: Option<TimeoutsConfig>,
    pub sources: Option<SourcesConfig>,
}

/// Timeouts in milliseconds. Unset values fall back to one second.
#[derive(Debug, Default, Deserialize)]
pub struct TimeoutsConfig {
    /// Cap on each individual HTTP request.
    pub request_ms: Option<u64>,
    /// How long to wait for the first result.
    pub race_ms: Option<u64>,
    /// How long to keep waiting for the slower source once the first result is in.
    pub secondary_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SourcesConfig {
    pub brasilapi: Option<SourceConfig>,
    pub viacep: Option<SourceConfig>,
}

impl SourcesConfig {
    #[must_use]
    pub fn get(&self, source: Source) -> Option<&SourceConfig> {
        match source {
            Source::BrasilApi => self.brasilapi.as_ref(),
            Source::ViaCep => self.viacep.as_ref(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SourceConfig {
    pub base_url: Option<String>,
    pub suffix: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: TomlError,
    },
    #[error("invalid {field}: {value:?} ({reason})")]
    Invalid {
        field: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl CepraceConfig {
    /// Load from the default location. `Ok(None)` when there is no file.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(config),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(".ceprace").join("config.toml"))
}
