//! Tool server binary
//!
//! Usage:
//!   tool-server                              Listen on 0.0.0.0:8000
//!   tool-server --listen 127.0.0.1:9000      Custom address
//!   tool-server --glossary terms.yaml        Index a scraped glossary
//!   tool-server --embedder hashing           Offline embeddings, no model download

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use tool_server::rag::Glossary;
use tool_server::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EmbedderKind {
    /// all-MiniLM-L6-v2 sentence embeddings
    #[cfg(feature = "fastembed")]
    Fastembed,
    /// Feature hashing over word tokens; matches shared words only
    Hashing,
}

#[cfg(feature = "fastembed")]
const DEFAULT_EMBEDDER: &str = "fastembed";
#[cfg(not(feature = "fastembed"))]
const DEFAULT_EMBEDDER: &str = "hashing";

#[derive(Debug, Parser)]
#[command(name = "tool-server", version, about = "HTTP tools for the chat brain")]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "TOOL_SERVER_LISTEN", default_value = "0.0.0.0:8000")]
    listen: String,

    /// YAML glossary of {term, definition} records; the built-in terms are used when omitted
    #[arg(long, env = "GLOSSARY_PATH")]
    glossary: Option<PathBuf>,

    /// Embedding backend for glossary retrieval
    #[arg(long, env = "TOOL_SERVER_EMBEDDER", value_enum, default_value = DEFAULT_EMBEDDER)]
    embedder: EmbedderKind,

    /// Directory the embedding model is downloaded to
    #[arg(long, env = "FASTEMBED_CACHE_DIR")]
    model_cache: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("tool_server=info".parse()?),
        )
        .init();

    let glossary = build_glossary(&cli).await?;
    if let Some(path) = &cli.glossary {
        glossary
            .load_yaml(path)
            .with_context(|| format!("loading glossary {}", path.display()))?;
    } else {
        tracing::info!("No glossary given, using built-in terms");
    }

    let listener = tokio::net::TcpListener::bind(&cli.listen)
        .await
        .with_context(|| format!("binding {}", cli.listen))?;

    tool_server::serve(listener, AppState::new(glossary)).await?;
    Ok(())
}

async fn build_glossary(cli: &Cli) -> Result<Glossary> {
    match cli.embedder {
        #[cfg(feature = "fastembed")]
        EmbedderKind::Fastembed => {
            let cache = cli.model_cache.clone();
            // Model load reads (and may download) weights
            let loaded = tokio::task::spawn_blocking(move || tool_server::rag::FastEmbedder::new(cache))
                .await
                .context("embedding model task")?;
            match loaded {
                Ok(embedder) => {
                    tracing::info!("Glossary embeddings: all-MiniLM-L6-v2");
                    let glossary = tokio::task::spawn_blocking(move || Glossary::new(std::sync::Arc::new(embedder)))
                        .await
                        .context("glossary index task")??;
                    Ok(glossary)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Embedding model unavailable, falling back to hashing embeddings");
                    Ok(Glossary::default())
                }
            }
        }
        EmbedderKind::Hashing => {
            tracing::info!("Glossary embeddings: feature hashing");
            Ok(Glossary::default())
        }
    }
}
