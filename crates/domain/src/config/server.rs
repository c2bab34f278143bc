use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub dns_port: u16,

    pub bind_address: String,

    /// UDP sockets bound to the same address with SO_REUSEPORT.
    pub num_workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            dns_port: 53,
            bind_address: "0.0.0.0".to_string(),
            num_workers: 1,
        }
    }
}
