use crate::endpoint::{join_host_port, split_host_port, Scheme};
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

/// Typed view of a normalized endpoint string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DnsProtocol {
    Udp {
        addr: SocketAddr,
    },
    Tls {
        addr: SocketAddr,
        server_name: Arc<str>,
    },
    Https {
        url: Arc<str>,
        hostname: Arc<str>,
    },
    Grpc {
        addr: SocketAddr,
    },
}

impl DnsProtocol {
    /// Replaces the name presented for certificate verification.
    /// Only DNS-over-TLS endpoints carry one; other variants are returned as-is.
    pub fn with_server_name(self, name: &str) -> Self {
        match self {
            DnsProtocol::Tls { addr, .. } => DnsProtocol::Tls {
                addr,
                server_name: name.into(),
            },
            other => other,
        }
    }
}

fn parse_socket_addr(host: &str, scheme: Scheme) -> Result<SocketAddr, String> {
    let (ip_str, port) = split_host_port(host).unwrap_or((host, scheme.default_port()));
    let ip: IpAddr = ip_str
        .split('%')
        .next()
        .unwrap_or(ip_str)
        .parse()
        .map_err(|e| format!("Invalid {} address '{}': {}", scheme.as_str(), host, e))?;
    Ok(SocketAddr::new(ip, port))
}

impl FromStr for DnsProtocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (scheme, host) = Scheme::split(s.trim());
        let addr = parse_socket_addr(host, scheme)?;

        Ok(match scheme {
            Scheme::Dns => DnsProtocol::Udp { addr },
            Scheme::Tls => DnsProtocol::Tls {
                addr,
                server_name: addr.ip().to_string().into(),
            },
            Scheme::Https => DnsProtocol::Https {
                url: format!(
                    "https://{}/dns-query",
                    join_host_port(&addr.ip().to_string(), addr.port())
                )
                .into(),
                hostname: addr.ip().to_string().into(),
            },
            Scheme::Grpc => DnsProtocol::Grpc { addr },
        })
    }
}

impl fmt::Display for DnsProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DnsProtocol::Udp { addr } => write!(f, "{}", addr),
            DnsProtocol::Tls { addr, .. } => write!(f, "tls://{}", addr),
            DnsProtocol::Https { url, .. } => write!(f, "{}", url),
            DnsProtocol::Grpc { addr } => write!(f, "grpc://{}", addr),
        }
    }
}
