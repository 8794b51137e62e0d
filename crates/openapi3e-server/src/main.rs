//! openapi3e document server
//!
//! Builds every document variant for the demo pet store API at startup and
//! serves them read-only.

use anyhow::Context;
use clap::Parser;
use openapi3e::BuildOptions;
use openapi3e_common::{TracingOptions, initialize_environment, initialize_tracing};
use openapi3e_config::{ConfigurationLoader, EnvironmentSource, TomlFileSource};
use openapi3e_server::{AppState, demo::PetStore, routes};
use std::path::PathBuf;
use tracing::info;

/// Serve generated OpenAPI documents
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Optional configuration file path (TOML format)
    #[arg(long, short = 'c')]
    config_file: Option<PathBuf>,

    /// Listen address, overriding the configuration
    #[arg(long)]
    host: Option<String>,

    /// Listen port, overriding the configuration
    #[arg(long, short = 'p')]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    initialize_environment();
    let args = Args::parse();

    let mut loader = ConfigurationLoader::new().add_source(Box::new(EnvironmentSource));
    if let Some(path) = &args.config_file {
        loader = loader.add_source(Box::new(TomlFileSource::new(path)));
    }
    let mut config = loader.load().context("invalid configuration")?;

    // Command-line arguments always override config file settings
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    initialize_tracing(&TracingOptions {
        level: config.telemetry.tracing_level.clone(),
        json: config.telemetry.log_json,
    });
    info!(title = %config.info.title, version = %config.info.version, "Starting openapi3e server...");

    let options = BuildOptions::from_config(&config).context("invalid document info")?;
    let cache = PetStore::define()
        .and_then(|store| store.into_cache(options))
        .context("failed to build OpenAPI documents")?;

    let app = routes::create_router(AppState::new(cache, &config.server.yaml_content_type));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listening on http://{addr}/openapi/spec.json");
    axum::serve(listener, app).await?;

    Ok(())
}
