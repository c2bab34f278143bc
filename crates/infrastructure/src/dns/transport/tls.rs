//! TLS Transport for DNS queries, DNS-over-TLS (RFC 7858)
//!
//! The rustls `ClientConfig` is built once and shared, so session resumption
//! works across queries. Each query opens its own connection.

use super::tcp::{read_with_length_prefix, send_with_length_prefix};
use super::DnsTransport;
use async_trait::async_trait;
use rustls::pki_types::ServerName;
use std::net::SocketAddr;
use std::sync::{Arc, LazyLock};
use tokio::net::TcpStream;
use tracing::debug;
use zonealias_domain::DomainError;

/// Shared TLS config, verified against the webpki root store.
static SHARED_TLS_CONFIG: LazyLock<Arc<rustls::ClientConfig>> = LazyLock::new(|| {
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let mut root_store = rustls::RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    Arc::new(config)
});

/// DNS-over-TLS transport (RFC 7858)
pub struct TlsTransport {
    server_addr: SocketAddr,
    server_name: String,
}

impl TlsTransport {
    pub fn new(server_addr: SocketAddr, server_name: String) -> Self {
        Self {
            server_addr,
            server_name,
        }
    }

    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    fn fail(&self, reason: impl std::fmt::Display) -> DomainError {
        DomainError::transport(format!("tls://{}", self.server_addr), reason)
    }
}

#[async_trait]
impl DnsTransport for TlsTransport {
    async fn send(&self, message_bytes: &[u8]) -> Result<Vec<u8>, DomainError> {
        let connector = tokio_rustls::TlsConnector::from(SHARED_TLS_CONFIG.clone());

        let server_name = ServerName::try_from(self.server_name.clone())
            .map_err(|e| self.fail(format!("invalid TLS server name '{}': {}", self.server_name, e)))?;

        let tcp_stream = TcpStream::connect(self.server_addr)
            .await
            .map_err(|e| self.fail(format!("connection refused: {}", e)))?;

        let mut stream = connector
            .connect(server_name, tcp_stream)
            .await
            .map_err(|e| self.fail(format!("TLS handshake failed: {}", e)))?;

        debug!(server = %self.server_addr, server_name = %self.server_name, "TLS connection established");

        send_with_length_prefix(&mut stream, message_bytes)
            .await
            .map_err(|e| self.fail(e))?;

        let response_bytes = read_with_length_prefix(&mut stream)
            .await
            .map_err(|e| self.fail(e))?;

        debug!(
            server = %self.server_addr,
            response_len = response_bytes.len(),
            "TLS response received"
        );

        Ok(response_bytes)
    }

    fn protocol_name(&self) -> &'static str {
        "TLS"
    }
}
