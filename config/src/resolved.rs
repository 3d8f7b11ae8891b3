//! Resolved configuration with every default applied.
use std::env::{self, VarError};
use std::time::Duration;

use ceprace_types::{Endpoint, Source};

use crate::{CepraceConfig, ConfigError, TIMEOUT_ENV};

pub const BRASILAPI_BASE_URL: &str = "https://brasilapi.com.br/api/cep/v1/";
pub const VIACEP_BASE_URL: &str = "https://viacep.com.br/ws/";
pub const VIACEP_SUFFIX: &str = "/json/";

/// Request cap, race cap and secondary-wait cap all default to this.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceConfig {
    request_timeout: Duration,
    race_timeout: Duration,
    secondary_timeout: Duration,
    endpoints: [Endpoint; 2],
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self::new(Source::ALL.map(default_endpoint))
    }
}

impl RaceConfig {
    /// Both endpoints with every timeout at [`DEFAULT_TIMEOUT`].
    #[must_use]
    pub fn new(endpoints: [Endpoint; 2]) -> Self {
        Self {
            request_timeout: DEFAULT_TIMEOUT,
            race_timeout: DEFAULT_TIMEOUT,
            secondary_timeout: DEFAULT_TIMEOUT,
            endpoints,
        }
    }

    /// Resolve the file config plus `CEPRACE_TIMEOUT_MS`.
    pub fn from_env(config: Option<&CepraceConfig>) -> Result<Self, ConfigError> {
        let raw = timeout_override(env::var(TIMEOUT_ENV))?;
        Self::resolve(config, raw.as_deref())
    }

    /// `timeout_override`, when present, replaces all three timeouts.
    pub fn resolve(
        config: Option<&CepraceConfig>,
        timeout_override: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let timeouts = config.and_then(|c| c.timeouts.as_ref());
        let sources = config.and_then(|c| c.sources.as_ref());

        let endpoint_for = |source: Source| {
            let configured = sources.and_then(|s| s.get(source));
            let default = default_endpoint(source);
            let base_url = configured
                .and_then(|c| c.base_url.clone())
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| default.base_url().to_string());
            let suffix = configured
                .and_then(|c| c.suffix.clone())
                .unwrap_or_else(|| default.suffix().to_string());
            Endpoint::new(source, base_url, suffix)
        };

        let mut resolved = Self::new(Source::ALL.map(endpoint_for));

        if let Some(timeouts) = timeouts {
            if let Some(ms) = timeouts.request_ms {
                resolved.request_timeout = millis("timeouts.request_ms", ms)?;
            }
            if let Some(ms) = timeouts.race_ms {
                resolved.race_timeout = millis("timeouts.race_ms", ms)?;
            }
            if let Some(ms) = timeouts.secondary_ms {
                resolved.secondary_timeout = millis("timeouts.secondary_ms", ms)?;
            }
        }

        if let Some(raw) = timeout_override {
            let ms = raw.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
                field: TIMEOUT_ENV,
                value: raw.to_string(),
                reason: "expected a whole number of milliseconds",
            })?;
            let timeout = millis(TIMEOUT_ENV, ms)?;
            resolved.request_timeout = timeout;
            resolved.race_timeout = timeout;
            resolved.secondary_timeout = timeout;
        }

        Ok(resolved)
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_race_timeout(mut self, timeout: Duration) -> Self {
        self.race_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_secondary_timeout(mut self, timeout: Duration) -> Self {
        self.secondary_timeout = timeout;
        self
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    #[must_use]
    pub fn race_timeout(&self) -> Duration {
        self.race_timeout
    }

    #[must_use]
    pub fn secondary_timeout(&self) -> Duration {
        self.secondary_timeout
    }

    #[must_use]
    pub fn endpoints(&self) -> &[Endpoint; 2] {
        &self.endpoints
    }
}

fn default_endpoint(source: Source) -> Endpoint {
    match source {
        Source::BrasilApi => Endpoint::new(source, BRASILAPI_BASE_URL, ""),
        Source::ViaCep => Endpoint::new(source, VIACEP_BASE_URL, VIACEP_SUFFIX),
    }
}

/// An empty variable counts as unset. A non-UTF-8 value is rejected like a
/// non-numeric one.
fn timeout_override(var: Result<String, VarError>) -> Result<Option<String>, ConfigError> {
    match var {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(raw)) => Err(ConfigError::Invalid {
            field: TIMEOUT_ENV,
            value: raw.to_string_lossy().into_owned(),
            reason: "expected a whole number of milliseconds",
        }),
    }
}

fn millis(field: &'static str, ms: u64) -> Result<Duration, ConfigError> {
    if ms == 0 {
        return Err(ConfigError::Invalid {
            field,
            value: ms.to_string(),
            reason: "timeout must be greater than zero",
        });
    }
    Ok(Duration::from_millis(ms))
}
