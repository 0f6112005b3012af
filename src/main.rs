//! Bedrock - Batteries-included web API starter
//!
//! Entry point for the bedrock server.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use bedrock::server::{init_metrics, init_tracing, App};
use bedrock::{Config, Result};
use clap::Parser;

/// Bedrock - Batteries-included web API starter
#[derive(Parser, Debug)]
#[command(name = "bedrock")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Service title shown on the documentation pages
    #[arg(long, env = "BEDROCK_TITLE", default_value = "bedrock")]
    title: String,

    /// Host address to bind to
    #[arg(long, env = "BEDROCK_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "BEDROCK_PORT", default_value = "8000")]
    port: u16,

    /// Allowed CORS origins, comma separated; `*` allows any origin
    #[arg(long, env = "BEDROCK_CORS_ORIGINS", value_delimiter = ',', default_value = "*")]
    cors_origins: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "BEDROCK_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, env = "BEDROCK_LOG_JSON")]
    log_json: bool,

    /// Directory served under `/static`
    #[arg(long, env = "BEDROCK_STATIC_DIR", default_value = "./static")]
    static_dir: std::path::PathBuf,

    /// Markdown file rendered at `/README`
    #[arg(long, env = "BEDROCK_README", default_value = "README.md")]
    readme: std::path::PathBuf,

    /// Expose Prometheus metrics at `/metrics`
    #[arg(
        long,
        env = "BEDROCK_METRICS_ENABLED",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    metrics_enabled: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.log_json);

    tracing::info!("bedrock v{} starting...", env!("CARGO_PKG_VERSION"));

    // Build config from CLI
    let config = Config {
        title: cli.title,
        host: cli.host,
        port: cli.port,
        cors_origins: cli.cors_origins,
        log_level: cli.log_level,
        log_json: cli.log_json,
        static_dir: cli.static_dir,
        readme_path: cli.readme,
        metrics_enabled: cli.metrics_enabled,
    };

    tracing::debug!(?config, "Configuration loaded");

    config.validate()?;

    tracing::info!(
        "Server will bind to {}, docs at /docs, README at /README",
        config.server_addr()
    );

    init_metrics();

    App::new(config).run().await
}
