use crate::dns::transport::{self, Transport};
use async_trait::async_trait;
use hickory_proto::op::Message;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use zonealias_application::ports::ExchangeProvider;
use zonealias_domain::{DnsProtocol, DomainError, ExchangeEndpointSet};

struct ExchangeTarget {
    endpoints: ExchangeEndpointSet,
    protocol: DnsProtocol,
    transport: Transport,
    server: String,
}

/// Exchanges messages with the first configured endpoint over UDP,
/// DNS-over-TLS or DNS-over-HTTPS.
///
/// Truncated UDP answers are returned as they are; the client sees the TC
/// bit and retries over TCP.
#[derive(Default)]
pub struct NetworkExchangeProvider {
    tls_server_name: Option<String>,
    target: Option<ExchangeTarget>,
}

impl NetworkExchangeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name presented for certificate verification on DNS-over-TLS endpoints.
    pub fn with_tls_server_name(mut self, name: impl Into<String>) -> Self {
        self.tls_server_name = Some(name.into());
        self
    }

    pub fn protocol(&self) -> Option<&DnsProtocol> {
        self.target.as_ref().map(|t| &t.protocol)
    }

    pub fn endpoints(&self) -> Option<&ExchangeEndpointSet> {
        self.target.as_ref().map(|t| &t.endpoints)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.target.as_ref().map(|t| t.endpoints.timeout())
    }
}

async fn round_trip(
    target: &ExchangeTarget,
    request_bytes: &[u8],
    request_id: u16,
) -> Result<Message, DomainError> {
    let response = target.transport.send(request_bytes).await?;
    let message = decode(&response, &target.server)?;

    if message.id() != request_id {
        return Err(DomainError::InvalidDnsResponse(format!(
            "response ID {} from {} does not match query ID {}",
            message.id(),
            target.server,
            request_id
        )));
    }

    if message.truncated() {
        debug!(server = %target.server, "Passing truncated response through");
    }
    Ok(message)
}

fn decode(bytes: &[u8], server: &str) -> Result<Message, DomainError> {
    Message::from_vec(bytes).map_err(|e| {
        DomainError::InvalidDnsResponse(format!("failed to parse response from {}: {}", server, e))
    })
}

#[async_trait]
impl ExchangeProvider for NetworkExchangeProvider {
    fn initialize(&mut self, endpoints: &ExchangeEndpointSet) -> Result<(), DomainError> {
        let mut protocol: DnsProtocol = endpoints
            .primary()
            .parse()
            .map_err(DomainError::EndpointResolution)?;

        if let Some(name) = &self.tls_server_name {
            protocol = protocol.with_server_name(name);
        }

        let transport = transport::create_transport(&protocol)?;
        let server = protocol.to_string();

        if endpoints.endpoints().len() > 1 {
            warn!(
                server = %server,
                ignored = endpoints.endpoints().len() - 1,
                "Only the first endpoint is used for exchanges"
            );
        }

        info!(
            server = %server,
            protocol = transport.protocol_name(),
            timeout_ms = endpoints.timeout().as_millis() as u64,
            "Exchange provider initialized"
        );

        self.target = Some(ExchangeTarget {
            endpoints: endpoints.clone(),
            protocol,
            transport,
            server,
        });
        Ok(())
    }

    async fn exchange(
        &self,
        cancel: &CancellationToken,
        request: &Message,
    ) -> Result<Message, DomainError> {
        let target = self.target.as_ref().ok_or_else(|| {
            DomainError::EndpointResolution("exchange provider is not initialized".to_string())
        })?;

        let request_bytes = request
            .to_vec()
            .map_err(|e| DomainError::transport(&target.server, format!("failed to encode query: {}", e)))?;

        let start = Instant::now();
        let timeout = target.endpoints.timeout();

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(DomainError::ExchangeCancelled {
                server: target.server.clone(),
            }),
            _ = tokio::time::sleep(timeout) => Err(DomainError::TransportTimeout {
                server: target.server.clone(),
            }),
            result = round_trip(target, &request_bytes, request.id()) => result,
        };

        debug!(
            server = %target.server,
            elapsed_us = start.elapsed().as_micros() as u64,
            ok = result.is_ok(),
            "Exchange finished"
        );

        result
    }
}
