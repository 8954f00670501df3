//! uri-gate
//!
//! Path-based authorization from the command line or over HTTP.

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;
use uri_gate::{
    access_control::{AuthorizeOptions, UriAuthorizer, resolve_base},
    config::{AppConfig, LogFormat, load_config},
    server::AuthorizeResponse,
    transport::{HttpConfig, run_http_blocking},
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// uri-gate - Group-based path authorization
#[derive(Parser, Debug)]
#[command(name = "uri-gate")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "URI_GATE_CONFIG", global = true)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error); defaults to the configured level
    #[arg(long, env = "URI_GATE_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a single path and print the decision as JSON
    Check {
        /// Resource path to check
        #[arg(long)]
        path: String,

        /// Caller group (repeatable)
        #[arg(short, long = "group")]
        groups: Vec<String>,

        /// Override the configured base depth
        #[arg(long)]
        base_depth: Option<usize>,
    },
    /// Serve the authorization endpoint over HTTP
    Serve {
        /// HTTP server host (defaults to server.host)
        #[arg(long, env = "URI_GATE_HTTP_HOST")]
        host: Option<String>,

        /// HTTP server port (defaults to server.port)
        #[arg(long, env = "URI_GATE_HTTP_PORT")]
        port: Option<u16>,
    },
}

fn init_logging(config: &AppConfig, level: Option<&str>) {
    let level = level.unwrap_or(&config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    match config.logging.format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Pick up URI_GATE_* variables from a local .env, if any
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    // Configuration comes first so its logging section can shape the subscriber
    let config = load_config(args.config.as_deref())?;
    init_logging(&config, args.log_level.as_deref());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        bases = config.rules.len(),
        "Loaded rule table"
    );

    let authorizer = UriAuthorizer::from_config(&config)
        .inspect_err(|e| error!(error = %e, "Failed to build rule table"))?;

    match args.command {
        Command::Check {
            path,
            groups,
            base_depth,
        } => {
            let options = base_depth
                .map(|base_depth| AuthorizeOptions { base_depth })
                .unwrap_or_else(|| authorizer.options());

            let decision = authorizer.evaluate_with(&path, &groups, &options);
            let allowed = decision.is_allowed();
            let base = resolve_base(&path, options.base_depth);
            let response = AuthorizeResponse::new(&path, base, decision);

            println!("{}", serde_json::to_string_pretty(&response)?);

            Ok(if allowed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let http_config = HttpConfig::from_host_port(&host, port)
                .inspect_err(|e| error!(error = %e, "Invalid HTTP bind address"))?;

            run_http_blocking(Arc::new(authorizer), http_config)
                .await
                .inspect_err(|e| error!(error = %e, "HTTP server error"))?;

            Ok(ExitCode::SUCCESS)
        }
    }
}
