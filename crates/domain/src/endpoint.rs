//! Backend endpoint addresses.
//!
//! Addresses come from configuration as `[scheme://]ip[:port]` or as a path to
//! a resolver configuration file. [`normalize_address`] turns the first form
//! into its canonical string and tells the caller when it has to read a file.

use crate::errors::DomainError;
use std::net::IpAddr;
use std::time::Duration;

pub const DNS_PORT: u16 = 53;
pub const TLS_PORT: u16 = 853;
pub const GRPC_PORT: u16 = 443;
pub const HTTPS_PORT: u16 = 443;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Dns,
    Tls,
    Grpc,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dns => "dns",
            Self::Tls => "tls",
            Self::Grpc => "grpc",
            Self::Https => "https",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            Self::Dns => DNS_PORT,
            Self::Tls => TLS_PORT,
            Self::Grpc => GRPC_PORT,
            Self::Https => HTTPS_PORT,
        }
    }

    /// Splits a known scheme prefix off `addr`. Unprefixed addresses are plain DNS.
    pub fn split(addr: &str) -> (Scheme, &str) {
        for scheme in [Self::Tls, Self::Dns, Self::Grpc, Self::Https] {
            if let Some(rest) = addr
                .strip_prefix(scheme.as_str())
                .and_then(|rest| rest.strip_prefix("://"))
            {
                return (scheme, rest);
            }
        }
        (Self::Dns, addr)
    }
}

/// Outcome of normalizing one configured address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedAddress {
    /// A ready-to-use endpoint string.
    Endpoint(String),
    /// Not an IP address; the value should be read as a resolver config file.
    File(String),
}

/// Splits `host:port`, accepting bracketed IPv6 hosts.
///
/// Returns `None` when there is no usable port, including bare IPv6
/// addresses which contain more than one colon.
pub fn split_host_port(s: &str) -> Option<(&str, u16)> {
    if let Some(rest) = s.strip_prefix('[') {
        let end = rest.find(']')?;
        let port = rest[end + 1..].strip_prefix(':')?.parse().ok()?;
        return Some((&rest[..end], port));
    }
    let (host, port) = s.rsplit_once(':')?;
    if host.contains(':') {
        return None;
    }
    Some((host, port.parse().ok()?))
}

/// Joins `host` and `port`, bracketing IPv6 hosts.
pub fn join_host_port(host: &str, port: u16) -> String {
    if host.contains(':') {
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    }
}

fn parse_ip(host: &str) -> Option<IpAddr> {
    let without_zone = host.split('%').next().unwrap_or(host);
    without_zone.parse().ok()
}

/// Normalizes a configured endpoint address.
///
/// - `ip:port` forms, with or without a scheme, are kept exactly as written.
/// - a bare IP gets the scheme's default port: `ip:53` for plain DNS (no
///   prefix), `tls://ip:853`, `grpc://ip:443`, `https://ip:443`.
/// - anything that is not an IP is reported as [`NormalizedAddress::File`].
pub fn normalize_address(addr: &str) -> Result<NormalizedAddress, DomainError> {
    let addr = addr.trim();
    let (scheme, host) = Scheme::split(addr);
    if host.is_empty() {
        return Err(DomainError::EndpointResolution(format!(
            "invalid address: {:?}",
            addr
        )));
    }

    if let Some((ip_part, _)) = split_host_port(host) {
        return Ok(match parse_ip(ip_part) {
            Some(_) => NormalizedAddress::Endpoint(addr.to_string()),
            None => NormalizedAddress::File(host.to_string()),
        });
    }

    if parse_ip(host).is_none() {
        return Ok(NormalizedAddress::File(host.to_string()));
    }

    let joined = join_host_port(host, scheme.default_port());
    Ok(NormalizedAddress::Endpoint(match scheme {
        Scheme::Dns => joined,
        other => format!("{}://{}", other.as_str(), joined),
    }))
}

/// The configured backend endpoints and the per-exchange timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeEndpointSet {
    endpoints: Vec<String>,
    timeout: Duration,
}

impl ExchangeEndpointSet {
    pub fn new(endpoints: Vec<String>, timeout: Duration) -> Result<Self, DomainError> {
        if endpoints.is_empty() {
            return Err(DomainError::EndpointResolution(
                "no endpoints specified".to_string(),
            ));
        }
        Ok(Self { endpoints, timeout })
    }

    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    /// The endpoint every exchange goes to.
    pub fn primary(&self) -> &str {
        &self.endpoints[0]
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
