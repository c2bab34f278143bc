use anyhow::Context;
use std::sync::Arc;
use tracing::info;
use zonealias_application::ports::ExchangeProvider;
use zonealias_application::services::HandlerChain;
use zonealias_application::use_cases::ForwardQueryUseCase;
use zonealias_domain::{Config, ZoneConfig};
use zonealias_infrastructure::dns::{DnsServerHandler, EndpointResolver, NetworkExchangeProvider};

/// Wires one forwarding handler chain per configured zone.
///
/// Any zone that fails to set up aborts the whole startup.
pub fn build_server_handler(
    config: &Config,
    resolver: &EndpointResolver,
) -> anyhow::Result<DnsServerHandler> {
    let mut handler = DnsServerHandler::new();

    for zone in &config.zones {
        let chain = build_zone_chain(zone, resolver)
            .with_context(|| format!("Failed to set up zone '{}'", zone.zone))?;
        handler.add_zone(&zone.zone, chain);
    }

    Ok(handler)
}

fn build_zone_chain(zone: &ZoneConfig, resolver: &EndpointResolver) -> anyhow::Result<HandlerChain> {
    let mapping = Arc::new(zone.mapping()?);
    let endpoints = resolver.endpoint_set(zone)?;

    let mut provider = NetworkExchangeProvider::new();
    if let Some(name) = &zone.tls_servername {
        provider = provider.with_tls_server_name(name.clone());
    }
    provider.initialize(&endpoints)?;

    info!(
        zone = mapping.from_zone(),
        to_zone = mapping.to_zone(),
        prefix_len = mapping.prefix_len(),
        endpoint = endpoints.primary(),
        "Zone configured"
    );

    let forward = Arc::new(ForwardQueryUseCase::new(mapping, Arc::new(provider)));
    Ok(HandlerChain::new(vec![forward]))
}
