//! zonealias domain layer
pub mod config;
pub mod dns_protocol;
pub mod endpoint;
pub mod errors;
pub mod zone;

pub use config::{CliOverrides, Config, ConfigError, ZoneConfig};
pub use dns_protocol::DnsProtocol;
pub use endpoint::{normalize_address, ExchangeEndpointSet, NormalizedAddress, Scheme};
pub use errors::DomainError;
pub use zone::{canonical_name, compute_zone_diff, is_subdomain, ZoneMapping};
