mod config;
mod server;
mod stats;

use clap::Parser;
use crate::config::Config;
use crate::server::run_server;
use orbit_core::{AssignAddressOperation, NodeIdentity, pick_free_port};
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "orbit-node")]
#[command(about = "Lightweight Orbit ledger node")]
struct Cli {
    /// Operator ledger address, recorded as the node's user
    address: String,
    /// Port to serve on (0 or omitted picks a free port)
    port: Option<u16>,
    /// Public tunnel URL advertised as the node host
    tunnel_url: Option<String>,
    /// Path to configuration file
    #[arg(short, long)]
    conf: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "orbit_server=info,orbit_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let cfg = match Config::from_file(cli.conf.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    let port = match cli.port.filter(|port| *port != 0) {
        Some(port) => port,
        None => match pick_free_port(cfg.node.port_range()) {
            Ok(port) => port,
            Err(e) => {
                tracing::error!("Failed to pick a free port: {}", e);
                std::process::exit(1);
            }
        },
    };

    let tunnel_url = cli.tunnel_url.or_else(|| cfg.node.tunnel_url.clone());
    let identity = Arc::new(NodeIdentity::generate(cli.address, port, tunnel_url));
    tracing::info!(
        "Starting Orbit node {} on port {} for {}",
        identity.node_id(),
        identity.port(),
        identity.user()
    );

    let relay = match cfg.relay_builder().build() {
        Ok(relay) => relay,
        Err(e) => {
            tracing::error!("Failed to build relay client: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = AssignAddressOperation::new(relay.clone())
        .run(&identity)
        .await
    {
        tracing::error!("Could not fetch orbit address: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run_server(cfg, identity, relay).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
