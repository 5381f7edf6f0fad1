//! Aggregator forwarding proxy.
//!
//! ```text
//!   Browser (donation front-end)
//!        │  GET/POST/PUT/DELETE /api/<upstream path>
//!        ▼
//!   ┌──────────────────────────────────────────────┐
//!   │ request id → trace → CORS headers → preflight │
//!   │        → forwarding pipeline                  │
//!   │   credential → path → outbound → relay        │
//!   └──────────────────────────────────────────────┘
//!        │  same method, Authorization: Bearer <token>
//!        ▼
//!   https://api.1inch.dev/<upstream path>
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use aggregator_proxy::config::{load_config, resolve_credential, validate_config, ConfigError, ProxyConfig};
use aggregator_proxy::lifecycle::{signals, Shutdown};
use aggregator_proxy::observability::{logging, metrics};
use aggregator_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "aggregator-proxy")]
#[command(about = "Forwards /api requests to the swap aggregator with a server-held token", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "PROXY_CONFIG")]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    logging::init_logging(&config.observability);
    tracing::info!("aggregator-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    let credential = resolve_credential(&config);
    if credential.token().is_none() {
        tracing::warn!(
            env_var = %config.credential.env_var,
            "Upstream credential not set; forwarded requests will fail with 500"
        );
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        prefix = %config.routing.prefix,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    let server = HttpServer::new(config, credential)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
