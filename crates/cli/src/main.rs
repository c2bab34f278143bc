use clap::Parser;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use zonealias_domain::CliOverrides;
use zonealias_infrastructure::dns::EndpointResolver;

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "zonealias")]
#[command(version = "0.1.0")]
#[command(about = "zonealias - transparent DNS zone remapping forwarder")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let cli_overrides = CliOverrides {
        dns_port: cli.dns_port,
        bind_address: cli.bind.clone(),
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    // Initialize logging
    bootstrap::init_logging(&config.logging);

    info!("Starting zonealias v{}", env!("CARGO_PKG_VERSION"));
    info!(
        dns_port = config.server.dns_port,
        bind_address = %config.server.bind_address,
        zones = config.zones.len(),
        "Configuration loaded"
    );

    // One forwarding chain per configured zone
    let handler = Arc::new(di::build_server_handler(&config, &EndpointResolver::new())?);

    let shutdown = CancellationToken::new();
    let dns_addr = format!("{}:{}", config.server.bind_address, config.server.dns_port);
    let num_workers = config.server.num_workers;

    let server_shutdown = shutdown.clone();
    let mut server_task = tokio::spawn(async move {
        server::start_dns_server(dns_addr, handler, num_workers, server_shutdown).await
    });

    tokio::select! {
        result = &mut server_task => {
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    error!(error = %e, "DNS server error");
                    return Err(e);
                }
                Err(e) => return Err(e.into()),
            }
        }
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Shutdown requested");
            shutdown.cancel();
            server_task.await??;
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
