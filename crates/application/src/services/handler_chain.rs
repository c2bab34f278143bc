use crate::ports::{QueryContext, QueryHandler, Served};
use hickory_proto::op::{Message, ResponseCode};
use std::sync::Arc;
use tracing::debug;
use zonealias_domain::DomainError;

/// Ordered list of handlers, composed once at startup.
pub struct HandlerChain {
    handlers: Vec<Arc<dyn QueryHandler>>,
}

impl HandlerChain {
    pub fn new(handlers: Vec<Arc<dyn QueryHandler>>) -> Self {
        Self { handlers }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs handlers in order until one of them answers.
    ///
    /// Falling off the end is a server failure carrying the name of the last
    /// handler that passed.
    pub async fn serve(&self, ctx: &QueryContext, query: &Message) -> Served {
        let mut last = "chain";

        for handler in &self.handlers {
            match handler.serve(ctx, query).await {
                Served::Next => {
                    debug!(handler = handler.name(), "Handler passed query on");
                    last = handler.name();
                }
                served => return served,
            }
        }

        Served::Status(
            ResponseCode::ServFail,
            DomainError::NoNextHandler(last.to_string()),
        )
    }
}
