use crate::system::{read_nameservers, DEFAULT_RESOLV_CONF};
use std::path::PathBuf;
use tracing::debug;
use zonealias_domain::{
    normalize_address, DomainError, ExchangeEndpointSet, NormalizedAddress, ZoneConfig,
};

/// Turns configured endpoint addresses into normalized endpoint strings.
pub struct EndpointResolver {
    resolv_conf: PathBuf,
}

impl EndpointResolver {
    pub fn new() -> Self {
        Self {
            resolv_conf: PathBuf::from(DEFAULT_RESOLV_CONF),
        }
    }

    /// Resolver config used when a zone lists no endpoints.
    pub fn with_resolv_conf(path: impl Into<PathBuf>) -> Self {
        Self {
            resolv_conf: path.into(),
        }
    }

    /// Normalizes `addresses` in order. Entries that are not IP addresses are
    /// read as resolver config files and contribute their nameservers.
    pub fn resolve(&self, addresses: &[String]) -> Result<Vec<String>, DomainError> {
        if addresses.is_empty() {
            let servers = read_nameservers(&self.resolv_conf).unwrap_or_default();
            debug!(
                path = %self.resolv_conf.display(),
                nameservers = servers.len(),
                "No endpoints configured, using system resolver config"
            );
            return Ok(servers);
        }

        let mut endpoints = Vec::with_capacity(addresses.len());
        for address in addresses {
            match normalize_address(address)? {
                NormalizedAddress::Endpoint(endpoint) => endpoints.push(endpoint),
                NormalizedAddress::File(path) => {
                    let servers = read_nameservers(&path).map_err(|_| {
                        DomainError::EndpointResolution(format!(
                            "not an IP address or file: {:?}",
                            path
                        ))
                    })?;
                    endpoints.extend(servers);
                }
            }
        }

        Ok(endpoints)
    }

    /// Builds the exchange endpoint set of one configured zone.
    pub fn endpoint_set(&self, zone: &ZoneConfig) -> Result<ExchangeEndpointSet, DomainError> {
        let timeout = zone
            .timeout()
            .map_err(|e| DomainError::ZoneConfiguration(e.to_string()))?;
        ExchangeEndpointSet::new(self.resolve(&zone.endpoints)?, timeout)
    }
}

impl Default for EndpointResolver {
    fn default() -> Self {
        Self::new()
    }
}
