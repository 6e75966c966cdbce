/*
edition - single-run main.rs
This binary lays out one report as the PDF newspaper and as chat transport pages.
*/

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::Parser;
use common::{Config, Report};
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use edition::pipeline::{run_to_directory, transport_dir, RunOptions};

#[derive(Parser, Debug)]
#[command(name = "edition", about = "Morning Edition layout: PDF newspaper + chat pages")]
struct Args {
    /// Report to lay out (.json or .toml)
    #[arg(long, value_name = "FILE")]
    report: PathBuf,

    /// Path to config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output directory (overrides [output] dir)
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Edition date, YYYY-MM-DD (defaults to today)
    #[arg(long, value_name = "DATE")]
    date: Option<NaiveDate>,

    /// Skip the PDF document
    #[arg(long)]
    no_document: bool,

    /// Skip the transport pages
    #[arg(long)]
    no_transport: bool,

    /// Override log level (info, debug, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI args
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    // Resolve config paths
    let default_path = PathBuf::from("config.default.toml");

    let override_path = if let Some(p) = args.config.clone() {
        if !p.exists() {
            error!(path = ?p, "specified config file not found");
            return Err(anyhow::anyhow!("Config file not found: {}", p.display()));
        }
        Some(p)
    } else {
        let p = PathBuf::from("config.toml");
        if p.exists() { Some(p) } else { None }
    };

    // Load configuration with defaults
    let config = match Config::load_with_defaults(
        if default_path.exists() { Some(default_path.as_path()) } else { None },
        override_path.as_deref(),
    )
    .await
    {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(%e, "failed to load configuration");
            return Err(e);
        }
    };
    info!(default = ?default_path, override = ?override_path, "configuration loaded");

    let report = Report::from_file(&args.report)
        .await
        .with_context(|| format!("Failed to load report {}", args.report.display()))?;
    if report.is_empty() {
        warn!(path = %args.report.display(), "report has no sections");
    }

    let out_dir = args
        .out_dir
        .clone()
        .or_else(|| config.output.dir.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("data"));
    let options = RunOptions {
        date: args.date.unwrap_or_else(|| Local::now().date_naive()),
        out_dir: out_dir.clone(),
        document: !args.no_document,
        transport: !args.no_transport,
    };

    let outcome = run_to_directory(&report, &config, &options).await;

    if let Some(path) = &outcome.document {
        info!(path = %path.display(), "document ready");
    }
    if let Some(dispatch) = &outcome.transport {
        info!(
            dir = %transport_dir(&out_dir).display(),
            delivered = dispatch.delivered(),
            failed = dispatch.failed(),
            "transport pages dispatched"
        );
    }
    for e in &outcome.errors {
        error!(%e, "edition cycle error");
    }

    if !outcome.succeeded() {
        return Err(anyhow::anyhow!("Edition cycle produced no output"));
    }
    info!("Edition cycle complete");
    Ok(())
}
