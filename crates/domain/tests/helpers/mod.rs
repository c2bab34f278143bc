#![allow(dead_code)]
use zonealias_domain::ZoneConfig;

pub struct ZoneConfigBuilder {
    config: ZoneConfig,
}

impl ZoneConfigBuilder {
    pub fn new(zone: &str, to_zone: &str) -> Self {
        Self {
            config: ZoneConfig::new(zone, to_zone),
        }
    }

    pub fn endpoint(mut self, endpoint: &str) -> Self {
        self.config.endpoints.push(endpoint.to_string());
        self
    }

    pub fn prefix_len(mut self, prefix_len: i64) -> Self {
        self.config.prefix_len = prefix_len;
        self
    }

    pub fn timeout(mut self, timeout: &str) -> Self {
        self.config.timeout = timeout.to_string();
        self
    }

    pub fn tls_servername(mut self, name: &str) -> Self {
        self.config.tls_servername = Some(name.to_string());
        self
    }

    pub fn build(self) -> ZoneConfig {
        self.config
    }
}

pub const FULL_CONFIG: &str = r#"
[server]
bind_address = "127.0.0.1"
dns_port = 5353
num_workers = 4

[[zones]]
zone = "dev.corp.net"
to_zone = "corp.net"
endpoints = ["dns://1.2.3.4", "tls://1.2.3.4"]
prefix_len = 2
timeout = "250ms"
tls_servername = "dns.corp.net"

[[zones]]
zone = "lab.example"
to_zone = "example.org"

[logging]
level = "debug"
"#;
