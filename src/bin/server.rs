//! # Ingest Server Binary Entry Point
//!
//! Thin wrapper that loads configuration and serves the ingest routes.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin ingest_server -- --config config/server.toml
//! cargo run --bin ingest_server -- --address 127.0.0.1:5000 --store-images
//! ```
//!
//! The server will:
//! 1. Load configuration from the TOML file, if one is given
//! 2. Apply command-line overrides
//! 3. Create the storage directory when image storage is enabled
//! 4. Serve `/`, `/uploadBase64`, `/upload` and `/ws` until shut down

use clap::Parser;
use env_logger::{Builder, Env};
use log::{info, LevelFilter};
use std::io::Write;
use std::sync::Arc;

// Import from the library crate
use image_ingest::common::config::{load_config, IngestConfig};
use image_ingest::server::{router, IngestService};

/// Command-line arguments for the server binary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the server configuration file (TOML format)
    ///
    /// Example: config/server.toml
    #[arg(short, long)]
    config: Option<String>,

    /// Address to listen on, overriding the configuration file
    #[arg(short, long)]
    address: Option<String>,

    /// Store every received image on disk, overriding the configuration file
    #[arg(long)]
    store_images: bool,
}

/// Initialize the logging system with timestamp, level, and message formatting.
///
/// INFO level by default; `RUST_LOG` takes precedence when set.
/// Format: `[HH:MM:SS] [LEVEL] message`
fn init_logger() {
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter_level(LevelFilter::Info)
        .parse_env(Env::default())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    init_logger();

    // Parse command-line arguments
    let args = Args::parse();

    let mut config: IngestConfig = match &args.config {
        Some(path) => load_config(path)?,
        None => IngestConfig::default(),
    };
    if let Some(address) = args.address {
        config.server.address = address;
    }
    if args.store_images {
        config.storage.store_images = true;
    }

    let service = Arc::new(IngestService::new(&config)?);
    let app = router(service);

    let addr = config.server.address.as_str();
    info!("🚀 Image upload server running on http://{}", addr);
    info!("📡 WebSocket endpoint: ws://{}/ws", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
