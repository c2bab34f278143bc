//! UDP Transport for DNS queries (RFC 1035 §4.2.1)
//!
//! Messages are sent as-is (no framing). A response with the TC bit set is
//! returned unchanged so the client can retry over TCP itself.

use super::DnsTransport;
use async_trait::async_trait;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::UdpSocket;
use tracing::{debug, warn};
use zonealias_domain::DomainError;

/// Largest payload a UDP datagram can carry. The forwarded query keeps the
/// client's EDNS(0) buffer size, so the upstream may use all of it.
const MAX_UDP_RESPONSE_SIZE: usize = 65535;

/// DNS over UDP transport
pub struct UdpTransport {
    server_addr: SocketAddr,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    fn fail(&self, reason: impl std::fmt::Display) -> DomainError {
        DomainError::transport(self.server_addr.to_string(), reason)
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(&self, message_bytes: &[u8]) -> Result<Vec<u8>, DomainError> {
        if message_bytes.len() < 2 {
            return Err(self.fail("query too short"));
        }
        let query_id = [message_bytes[0], message_bytes[1]];

        // Bind to ephemeral port (0 = OS assigns)
        let bind_addr: SocketAddr = if self.server_addr.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };

        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| self.fail(format!("failed to bind UDP socket: {}", e)))?;

        let bytes_sent = socket
            .send_to(message_bytes, self.server_addr)
            .await
            .map_err(|e| self.fail(format!("failed to send UDP query: {}", e)))?;

        debug!(
            server = %self.server_addr,
            bytes_sent = bytes_sent,
            "UDP query sent"
        );

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];

        loop {
            let (bytes_received, from_addr) = socket
                .recv_from(&mut recv_buf)
                .await
                .map_err(|e| self.fail(format!("failed to receive UDP response: {}", e)))?;

            if from_addr != self.server_addr {
                warn!(
                    expected = %self.server_addr,
                    received_from = %from_addr,
                    "Discarding UDP response from unexpected source"
                );
                continue;
            }

            if bytes_received < 2 || recv_buf[..2] != query_id {
                warn!(
                    server = %self.server_addr,
                    bytes_received = bytes_received,
                    "Discarding UDP response with mismatched ID"
                );
                continue;
            }

            recv_buf.truncate(bytes_received);

            debug!(
                server = %self.server_addr,
                bytes_received = bytes_received,
                "UDP response received"
            );

            return Ok(recv_buf);
        }
    }

    fn protocol_name(&self) -> &'static str {
        "UDP"
    }
}
