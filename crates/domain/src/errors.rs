use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Loop request detected")]
    LoopDetected,

    #[error("Invalid zone configuration: {0}")]
    ZoneConfiguration(String),

    #[error("Endpoint resolution failed: {0}")]
    EndpointResolution(String),

    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("Transport failure talking to {server}: {reason}")]
    Transport { server: String, reason: String },

    #[error("Transport timeout talking to {server}")]
    TransportTimeout { server: String },

    #[error("Exchange with {server} cancelled")]
    ExchangeCancelled { server: String },

    #[error("No next handler after '{0}'")]
    NoNextHandler(String),
}

impl DomainError {
    /// True when the exchange was cut short by its deadline or by the caller's
    /// cancellation signal, as opposed to failing on the wire.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            DomainError::TransportTimeout { .. } | DomainError::ExchangeCancelled { .. }
        )
    }

    pub fn transport(server: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        DomainError::Transport {
            server: server.into(),
            reason: reason.to_string(),
        }
    }
}
