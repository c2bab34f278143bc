use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::duration::parse_duration;
use super::errors::ConfigError;
use crate::errors::DomainError;
use crate::zone::ZoneMapping;

/// Exchange timeout used when none is configured or when `timeout = "0"`.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// One `[[zones]]` table: a served zone and where its queries go.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ZoneConfig {
    pub zone: String,

    #[serde(default)]
    pub to_zone: String,

    /// Backend addresses or resolver config files. Empty means `/etc/resolv.conf`.
    #[serde(default, alias = "endpoint")]
    pub endpoints: Vec<String>,

    #[serde(default = "default_prefix_len")]
    pub prefix_len: i64,

    #[serde(default = "default_timeout")]
    pub timeout: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_servername: Option<String>,
}

fn default_prefix_len() -> i64 {
    1
}

fn default_timeout() -> String {
    "5s".to_string()
}

impl ZoneConfig {
    pub fn new(zone: &str, to_zone: &str) -> Self {
        Self {
            zone: zone.to_string(),
            to_zone: to_zone.to_string(),
            endpoints: Vec::new(),
            prefix_len: default_prefix_len(),
            timeout: default_timeout(),
            tls_servername: None,
        }
    }

    /// Builds the validated zone mapping for this entry.
    pub fn mapping(&self) -> Result<ZoneMapping, DomainError> {
        if self.to_zone.trim().is_empty() {
            return Err(DomainError::ZoneConfiguration(
                "'to_zone' parameter is required".to_string(),
            ));
        }
        if self.prefix_len < 1 {
            return Err(DomainError::ZoneConfiguration(format!(
                "prefix_len can't be less than 1: {}",
                self.prefix_len
            )));
        }
        let prefix_len = usize::try_from(self.prefix_len).map_err(|_| {
            DomainError::ZoneConfiguration(format!("prefix_len too large: {}", self.prefix_len))
        })?;

        ZoneMapping::new(&self.zone, &self.to_zone, prefix_len)
    }

    /// Parsed exchange timeout. `"0"` selects [`DEFAULT_TIMEOUT`].
    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        let nanos = parse_duration(self.timeout.trim())
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        if nanos < 0 {
            return Err(ConfigError::Validation(format!(
                "timeout can't be negative: {}",
                self.timeout
            )));
        }
        if nanos == 0 {
            return Ok(DEFAULT_TIMEOUT);
        }

        let nanos = u64::try_from(nanos)
            .map_err(|_| ConfigError::Validation(format!("invalid duration: {:?}", self.timeout)))?;
        Ok(Duration::from_nanos(nanos))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.mapping()
            .map_err(|e| ConfigError::Validation(format!("zone '{}': {}", self.zone, e)))?;
        self.timeout()
            .map_err(|e| ConfigError::Validation(format!("zone '{}': {}", self.zone, e)))?;

        if self.endpoints.iter().any(|e| e.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "zone '{}': empty endpoint entry",
                self.zone
            )));
        }
        if let Some(name) = &self.tls_servername {
            if name.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "zone '{}': tls_servername cannot be empty",
                    self.zone
                )));
            }
        }

        Ok(())
    }
}
