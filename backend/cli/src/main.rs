mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use tickbook_core::ExtractionProvider;
use tickbook_extract::providers::AnthropicProvider;
use tickbook_gateway::{start_server, AppState};

use config::Config;

#[derive(Parser)]
#[command(name = "tickbook")]
#[command(about = "Tickbook — oilfield invoice extraction service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Tickbook HTTP server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Check the health of a running server
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            let config = Config {
                port: port.unwrap_or(config.port),
                ..config
            };
            run_server(config).await?;
        }
        Commands::Status => {
            let client = reqwest::Client::new();
            match client
                .get(format!("http://localhost:{}/api/health", config.port))
                .send()
                .await
            {
                Ok(resp) => {
                    let body: serde_json::Value = resp.json().await?;
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                Err(_) => {
                    println!("Tickbook is not running on port {}", config.port);
                }
            }
        }
    }

    Ok(())
}

async fn run_server(config: Config) -> Result<()> {
    info!(
        port = config.port,
        bind = %config.bind_address,
        "Starting Tickbook gateway"
    );

    let provider: Option<Arc<dyn ExtractionProvider>> = match &config.anthropic_api_key {
        Some(api_key) => {
            let mut provider = AnthropicProvider::new(api_key);
            if let Some(url) = &config.anthropic_base_url {
                provider = provider.with_base_url(url);
            }
            if let Some(model) = &config.model {
                provider = provider.with_model(model);
            }
            info!("Registered Anthropic extraction provider");
            Some(Arc::new(provider))
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set; invoice requests will fail until it is configured");
            None
        }
    };

    let state = AppState { provider };
    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.port).parse()?;
    start_server(addr, state).await
}
