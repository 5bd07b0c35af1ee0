//! Mouthpiece Server
//!
//! A WebSocket server that accepts text and returns synthesized speech together
//! with a viseme timeline for lip-sync.
//!
//! Usage:
//!   cargo run --release -p mouthpiece-server
//!
//! The server listens on ws://127.0.0.1:9876 by default. See `ServerConfig`
//! for the environment variables it reads.

use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing::info;

use mouthpiece_server::{serve, EspeakSynthesizer, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_directive().parse()?)
                .add_directive("tokio_tungstenite=warn".parse()?),
        )
        .init();

    info!("Using speech program '{}'", config.espeak_program);
    let synth = Arc::new(EspeakSynthesizer::new(config.espeak_program.clone()));

    let listener = TcpListener::bind(config.addr).await?;
    info!("Mouthpiece server listening on ws://{}", config.addr);

    serve(listener, synth).await
}
