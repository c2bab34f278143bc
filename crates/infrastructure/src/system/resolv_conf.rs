use std::io;
use std::net::IpAddr;
use std::path::Path;
use tracing::{debug, warn};
use zonealias_domain::endpoint::{join_host_port, DNS_PORT};

pub const DEFAULT_RESOLV_CONF: &str = "/etc/resolv.conf";

/// Extracts `nameserver` entries as `ip:53` endpoints, in file order.
pub fn parse_nameservers(content: &str) -> Vec<String> {
    // Format of resolv.conf:
    // # comment
    // nameserver 192.168.1.1
    // nameserver fe80::1%eth0
    // search lan

    let mut servers = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        let mut fields = line.split_whitespace();
        if fields.next() != Some("nameserver") {
            continue;
        }
        let Some(addr) = fields.next() else {
            continue;
        };

        let ip_part = addr.split('%').next().unwrap_or(addr);
        match ip_part.parse::<IpAddr>() {
            Ok(_) => servers.push(join_host_port(addr, DNS_PORT)),
            Err(e) => warn!(error = %e, nameserver = addr, "Invalid nameserver in resolver config"),
        }
    }

    servers
}

/// Reads the nameservers of a resolver config file.
pub fn read_nameservers(path: impl AsRef<Path>) -> io::Result<Vec<String>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let servers = parse_nameservers(&content);
    debug!(path = %path.display(), nameservers = servers.len(), "Resolver config parsed");
    Ok(servers)
}
