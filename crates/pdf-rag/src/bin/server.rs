//! PDF RAG server binary
//!
//! Run with: cargo run -p pdf-rag --bin pdf-rag-server -- --config pdf-rag.toml

use clap::Parser;
use pdf_rag::{Providers, RagConfig, RagServer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Ask questions about an uploaded PDF
#[derive(Debug, Parser)]
#[command(name = "pdf-rag-server", version, about)]
struct Cli {
    /// TOML configuration file; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf_rag=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => RagConfig::load(path)?,
        None => RagConfig::from_env(),
    };
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.validate()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Document: {}", config.storage.document_path.display());
    tracing::info!("  - Index dir: {}", config.storage.index_dir.display());
    tracing::info!(
        "  - Embedding model: {} ({} dims)",
        config.embeddings.model,
        config.embeddings.dimensions
    );
    tracing::info!("  - Generation: {:?} at {}", config.llm.provider, config.llm.base_url);
    tracing::info!("  - Top k: {}", config.retrieval.top_k);

    let providers = Providers::from_config(&config)?;

    if !providers.embedder.health_check().await.unwrap_or(false) {
        tracing::warn!("Embedding backend not reachable at {}", config.embeddings.base_url);
        tracing::warn!(
            "  Start Ollama and pull the model: ollama pull {}",
            config.embeddings.model
        );
    }
    if !providers.llm.health_check().await.unwrap_or(false) {
        tracing::warn!("Generation backend not reachable at {}", config.llm.base_url);
    }

    let server = RagServer::new(config, providers);
    server.prime().await;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /upload  - Upload a PDF (multipart field \"file\")");
    println!("  POST /ask     - Ask a question {{\"question\": \"...\"}}");
    println!("  GET  /status  - Index status");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
