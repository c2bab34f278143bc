use async_trait::async_trait;
use hickory_proto::op::Message;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;
use zonealias_application::ports::ExchangeProvider;
use zonealias_domain::{DomainError, ExchangeEndpointSet};

type InitFn = dyn Fn(&ExchangeEndpointSet) -> Result<(), DomainError> + Send + Sync;
type ExchangeFn = dyn Fn(&Message) -> Result<Message, DomainError> + Send + Sync;

/// Exchange provider with injectable behaviour. Echoes the request by default.
pub struct StubExchangeProvider {
    init: Box<InitFn>,
    exchange: Box<ExchangeFn>,
    endpoints: Option<ExchangeEndpointSet>,
    requests: Mutex<Vec<Message>>,
}

impl StubExchangeProvider {
    pub fn new() -> Self {
        Self {
            init: Box::new(|_| Ok(())),
            exchange: Box::new(|request| Ok(request.clone())),
            endpoints: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_init<F>(mut self, f: F) -> Self
    where
        F: Fn(&ExchangeEndpointSet) -> Result<(), DomainError> + Send + Sync + 'static,
    {
        self.init = Box::new(f);
        self
    }

    pub fn with_exchange<F>(mut self, f: F) -> Self
    where
        F: Fn(&Message) -> Result<Message, DomainError> + Send + Sync + 'static,
    {
        self.exchange = Box::new(f);
        self
    }

    pub fn endpoints(&self) -> Option<&ExchangeEndpointSet> {
        self.endpoints.as_ref()
    }

    pub fn requests(&self) -> Vec<Message> {
        self.requests.lock().unwrap().clone()
    }

    pub fn exchange_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ExchangeProvider for StubExchangeProvider {
    fn initialize(&mut self, endpoints: &ExchangeEndpointSet) -> Result<(), DomainError> {
        (self.init)(endpoints)?;
        self.endpoints = Some(endpoints.clone());
        Ok(())
    }

    async fn exchange(
        &self,
        cancel: &CancellationToken,
        request: &Message,
    ) -> Result<Message, DomainError> {
        self.requests.lock().unwrap().push(request.clone());
        if cancel.is_cancelled() {
            return Err(DomainError::ExchangeCancelled {
                server: "stub".to_string(),
            });
        }
        (self.exchange)(request)
    }
}
