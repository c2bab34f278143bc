use async_trait::async_trait;
use hickory_proto::op::Message;
use tokio_util::sync::CancellationToken;
use zonealias_domain::{DomainError, ExchangeEndpointSet};

/// Sends one DNS message to a backend and returns its reply.
#[async_trait]
pub trait ExchangeProvider: Send + Sync {
    /// Stores the endpoints and timeout. Called once, before any exchange.
    fn initialize(&mut self, endpoints: &ExchangeEndpointSet) -> Result<(), DomainError>;

    /// Performs a single exchange, bounded by the configured timeout and by
    /// `cancel`, whichever fires first.
    async fn exchange(
        &self,
        cancel: &CancellationToken,
        request: &Message,
    ) -> Result<Message, DomainError>;
}
