use std::{io, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{EnvFilter, filter::Directive};

use crate::{
    config::Config,
    output::{PROJECTION_LOG_TARGET, emit, project},
    play::fetch_track_listing,
};

#[derive(Parser, Debug)]
#[command(
    name = "playtracks",
    version,
    about = "Report the highest version code live on Google Play",
    long_about = None
)]
pub struct Cli {
    /// Service account key: JSON text, @env:NAME or @file:PATH.
    /// Read from $CREDENTIALS when omitted.
    #[arg(long, default_value = "", hide_default_value = true)]
    credentials: String,

    /// Application package name, e.g. com.example.app
    #[arg(long, env = "PACKAGE_NAME", default_value = "")]
    package_name: String,

    /// One of highest, production, beta, alpha, internal or response
    #[arg(long, env = "OUTPUT_STYLE", default_value = "")]
    output_style: String,

    /// JMESPath expression applied to the output before printing.
    /// Version codes are numbers inside the expression
    #[arg(long, env = "JMESPATH_EXPR", default_value = "")]
    jmespath_expr: String,

    /// Overall time limit for talking to the API, e.g. 30s or 1m
    #[arg(long, env = "TIME_LIMIT", value_parser = humantime::parse_duration, default_value = "30s")]
    time_limit: Duration,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    pub fn config(&self) -> crate::error::Result<Config> {
        Config::new(
            &self.package_name,
            &self.output_style,
            &self.jmespath_expr,
            self.time_limit,
            &self.credentials,
        )
    }
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let cfg = cli.config()?;

    let pb = spinner("Loading tracks...");
    let listing = fetch_track_listing(&cfg.package_name, cfg.credentials.clone(), cfg.time_limit).await;
    pb.finish_and_clear();
    let listing = listing.with_context(|| format!("listing tracks of {}", cfg.package_name))?;

    let output = project(cfg.view.render(listing), &cfg.jmespath_expr);
    emit(&output, io::stdout().lock())?;
    Ok(())
}

/// Builds the log filter from `RUST_LOG`-style directives.
///
/// Projection warnings stay enabled even when the directives silence
/// everything else.
pub fn log_filter(verbose: bool, directives: Option<&str>) -> EnvFilter {
    let default = if verbose { "debug" } else { "warn" };
    let filter = directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(default));
    match format!("{PROJECTION_LOG_TARGET}=warn").parse::<Directive>() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

fn init_tracing(verbose: bool) {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, directives.as_deref()))
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(Duration::from_millis(80));
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb
}
