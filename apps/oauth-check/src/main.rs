//! `oauth-check`: verify one bearer token against one request path.
//!
//! Exit codes: 0 authenticated, 1 rejected or unauthenticated, 2 malformed
//! token, 3 collaborator failure, 4 configuration or usage error.

mod config;
mod logging;
mod report;
mod wiring;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use http::{Method, Uri};
use oauth_sdk::AuthRequest;

use crate::config::AppConfig;
use crate::report::Report;

const SETUP_FAILURE: u8 = 4;

#[derive(Debug, Parser)]
#[command(name = "oauth-check", version, about)]
struct Cli {
    /// YAML configuration file.
    #[arg(short, long)]
    config: PathBuf,

    /// Compact JWT, without the `Bearer ` prefix.
    #[arg(short, long)]
    token: String,

    /// Request path, including the context path if one is configured.
    #[arg(short, long)]
    path: String,

    #[arg(short, long, default_value = "GET", value_parser = parse_method)]
    method: Method,

    /// Emit logs as JSON lines.
    #[arg(long)]
    json_logs: bool,
}

fn parse_method(raw: &str) -> Result<Method, http::method::InvalidMethod> {
    raw.to_ascii_uppercase().parse()
}

async fn run(cli: &Cli) -> anyhow::Result<Report> {
    let cfg = AppConfig::load(&cli.config)?;
    let registry = wiring::build_registry(&cfg).await?;

    let uri: Uri = cli
        .path
        .parse()
        .with_context(|| format!("'{}' is not a request path", cli.path))?;
    let request = AuthRequest::from_uri(cli.method.clone(), &uri, &cfg.resolver.context_path);
    tracing::debug!(path = request.path(), resource = ?request.resource(), "checking request");

    Ok(Report::from(registry.authenticate(&request, &cli.token)))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.json_logs);

    let report = match run(&cli).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "oauth-check could not run");
            return ExitCode::from(SETUP_FAILURE);
        }
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            tracing::error!(error = %e, "cannot render report");
            return ExitCode::from(SETUP_FAILURE);
        }
    }
    report.exit_code()
}
