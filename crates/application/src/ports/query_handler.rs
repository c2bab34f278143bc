use async_trait::async_trait;
use hickory_proto::op::{Message, ResponseCode};
use std::net::IpAddr;
use tokio_util::sync::CancellationToken;
use zonealias_domain::DomainError;

/// Per-request state handed down the handler chain.
#[derive(Debug, Clone)]
pub struct QueryContext {
    pub client_ip: IpAddr,
    pub cancel: CancellationToken,
}

impl QueryContext {
    pub fn new(client_ip: IpAddr, cancel: CancellationToken) -> Self {
        Self { client_ip, cancel }
    }
}

/// What a handler did with a query.
#[derive(Debug)]
pub enum Served {
    /// A complete response to send to the client.
    Reply(Message),
    /// No response was built; the entry point answers with this code.
    Status(ResponseCode, DomainError),
    /// Not handled here, try the next handler.
    Next,
}

#[async_trait]
pub trait QueryHandler: Send + Sync {
    fn name(&self) -> &str;

    async fn serve(&self, ctx: &QueryContext, query: &Message) -> Served;
}
