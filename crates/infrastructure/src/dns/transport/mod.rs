pub mod https;
pub mod tcp;
pub mod tls;
pub mod udp;

use async_trait::async_trait;
use zonealias_domain::{DnsProtocol, DomainError};

/// One request/response round trip over a single transport, returning the
/// raw response bytes.
///
/// Transports do not enforce deadlines themselves; the caller races
/// [`DnsTransport::send`] against its timeout and cancellation signal.
#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(&self, message_bytes: &[u8]) -> Result<Vec<u8>, DomainError>;

    fn protocol_name(&self) -> &'static str;
}

pub enum Transport {
    Udp(udp::UdpTransport),
    #[cfg(feature = "dns-over-rustls")]
    Tls(tls::TlsTransport),
    #[cfg(feature = "dns-over-https")]
    Https(https::HttpsTransport),
}

impl Transport {
    pub async fn send(&self, message_bytes: &[u8]) -> Result<Vec<u8>, DomainError> {
        match self {
            Self::Udp(t) => DnsTransport::send(t, message_bytes).await,
            #[cfg(feature = "dns-over-rustls")]
            Self::Tls(t) => DnsTransport::send(t, message_bytes).await,
            #[cfg(feature = "dns-over-https")]
            Self::Https(t) => DnsTransport::send(t, message_bytes).await,
        }
    }

    pub fn protocol_name(&self) -> &'static str {
        match self {
            Self::Udp(_) => "UDP",
            #[cfg(feature = "dns-over-rustls")]
            Self::Tls(_) => "TLS",
            #[cfg(feature = "dns-over-https")]
            Self::Https(_) => "HTTPS",
        }
    }
}

pub fn create_transport(protocol: &DnsProtocol) -> Result<Transport, DomainError> {
    match protocol {
        DnsProtocol::Udp { addr } => Ok(Transport::Udp(udp::UdpTransport::new(*addr))),

        #[cfg(feature = "dns-over-rustls")]
        DnsProtocol::Tls { addr, server_name } => Ok(Transport::Tls(tls::TlsTransport::new(
            *addr,
            server_name.to_string(),
        ))),

        #[cfg(not(feature = "dns-over-rustls"))]
        DnsProtocol::Tls { .. } => Err(DomainError::EndpointResolution(format!(
            "TLS feature not enabled. Enable 'dns-over-rustls' feature to use: {}",
            protocol
        ))),

        #[cfg(feature = "dns-over-https")]
        DnsProtocol::Https { url, .. } => Ok(Transport::Https(https::HttpsTransport::new(
            url.to_string(),
        ))),

        #[cfg(not(feature = "dns-over-https"))]
        DnsProtocol::Https { url, .. } => Err(DomainError::EndpointResolution(format!(
            "HTTPS feature not enabled. Enable 'dns-over-https' feature to use: {}",
            url
        ))),

        DnsProtocol::Grpc { .. } => Err(DomainError::EndpointResolution(format!(
            "gRPC transport is not supported: {}",
            protocol
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_udp_transport() {
        let protocol: DnsProtocol = "1.2.3.4:53".parse().unwrap();
        let transport = create_transport(&protocol).unwrap();
        assert_eq!(transport.protocol_name(), "UDP");
    }

    #[test]
    fn test_grpc_is_rejected() {
        let protocol: DnsProtocol = "grpc://1.2.3.4:443".parse().unwrap();
        let err = create_transport(&protocol).err().unwrap();
        assert_eq!(
            err,
            DomainError::EndpointResolution(
                "gRPC transport is not supported: grpc://1.2.3.4:443".to_string()
            )
        );
    }

    #[cfg(feature = "dns-over-rustls")]
    #[test]
    fn test_create_tls_transport() {
        let protocol: DnsProtocol = "tls://1.2.3.4:853".parse().unwrap();
        let transport = create_transport(&protocol).unwrap();
        assert_eq!(transport.protocol_name(), "TLS");
    }

    #[cfg(feature = "dns-over-https")]
    #[test]
    fn test_create_https_transport() {
        let protocol: DnsProtocol = "https://1.2.3.4:443".parse().unwrap();
        let transport = create_transport(&protocol).unwrap();
        assert_eq!(transport.protocol_name(), "HTTPS");
    }
}
