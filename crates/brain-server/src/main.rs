//! Brain - chat server with LLM tool calling
//!
//! Usage:
//!   brain                                 Serve on 0.0.0.0:8001, tools at http://127.0.0.1:8000
//!   brain --provider mock                 Offline echo provider
//!   brain --config brain.yaml             Settings from a YAML file
//!   brain --init-config                   Write the resolved settings and exit
//!   brain --help                          Show all flags

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use brain_core::{create_provider, Logger, TracingLogger};
use brain_server::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("brain=info".parse()?)
                .add_directive("brain_server=info".parse()?)
                .add_directive("brain_core=info".parse()?),
        )
        .init();

    let config = cli.resolve_config().context("loading configuration")?;

    if cli.init_config {
        let path = cli.config_path();
        config.save(&path).context("writing configuration")?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let logger: Arc<dyn Logger> = Arc::new(TracingLogger::new("brain"));
    let provider = create_provider(&config.provider, Arc::clone(&logger));

    let state = brain_server::build_state(&config, provider, logger).await?;

    let listener = tokio::net::TcpListener::bind(&config.listen)
        .await
        .with_context(|| format!("binding {}", config.listen))?;

    brain_server::serve(listener, state).await?;
    Ok(())
}
