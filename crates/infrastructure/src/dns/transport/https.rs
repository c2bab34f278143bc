//! HTTPS Transport for DNS queries, DNS-over-HTTPS (RFC 8484)
//!
//! Sends DNS queries as HTTP POST requests with `application/dns-message` content type.
//! The request body is the raw DNS wire format message, and the response body
//! contains the raw DNS wire format response.
//!
//! Wire format (HTTP):
//! ```text
//! POST /dns-query HTTP/2
//! Content-Type: application/dns-message
//! Accept: application/dns-message
//!
//! <raw DNS message bytes>
//! ```

use super::DnsTransport;
use async_trait::async_trait;
use std::sync::LazyLock;
use tracing::debug;
use zonealias_domain::DomainError;

/// Shared HTTP client with connection pooling.
static SHARED_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .use_rustls_tls()
        .pool_max_idle_per_host(4)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
});

/// Expected content type for DNS-over-HTTPS messages (RFC 8484 §4.2.1)
const DNS_MESSAGE_CONTENT_TYPE: &str = "application/dns-message";

/// DNS-over-HTTPS transport (RFC 8484)
pub struct HttpsTransport {
    url: String,
}

impl HttpsTransport {
    pub fn new(url: String) -> Self {
        Self { url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn fail(&self, reason: impl std::fmt::Display) -> DomainError {
        DomainError::transport(self.url.clone(), reason)
    }
}

#[async_trait]
impl DnsTransport for HttpsTransport {
    async fn send(&self, message_bytes: &[u8]) -> Result<Vec<u8>, DomainError> {
        debug!(
            url = %self.url,
            message_len = message_bytes.len(),
            "Sending DoH query"
        );

        // POST with application/dns-message (RFC 8484 §4.1)
        let response = SHARED_CLIENT
            .post(&self.url)
            .header("Content-Type", DNS_MESSAGE_CONTENT_TYPE)
            .header("Accept", DNS_MESSAGE_CONTENT_TYPE)
            .body(message_bytes.to_vec())
            .send()
            .await
            .map_err(|e| self.fail(format!("DoH request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.fail(format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let response_bytes = response
            .bytes()
            .await
            .map_err(|e| self.fail(format!("failed to read DoH response: {}", e)))?;

        debug!(
            url = %self.url,
            response_len = response_bytes.len(),
            "DoH response received"
        );

        Ok(response_bytes.to_vec())
    }

    fn protocol_name(&self) -> &'static str {
        "HTTPS"
    }
}
