//! Replays a recorded widget signal trace through the event-sounds engine and
//! prints the sounds it would have played.
//!
//! Usage:
//!   event-sounds-replay trace.json
//!   event-sounds-replay trace.json --config sounds.json --format json
//!   RUST_LOG=event_sounds=trace event-sounds-replay trace.json

mod replay;
mod scenario;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tokio::task::LocalSet;
use tracing::info;
use tracing_subscriber::EnvFilter;

use event_sounds::EngineConfig;
use replay::ReplaySummary;
use scenario::Scenario;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[clap(rename_all = "lower")]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "event-sounds-replay")]
#[command(about = "Replay widget signal traces and report the UI sounds they produce")]
struct Args {
    /// Scenario file (JSON)
    scenario: PathBuf,

    /// Engine configuration file (JSON). Takes precedence over the
    /// scenario's embedded config.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log coalescing and dispatch decisions
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_config(args: &Args, scenario: &Scenario) -> Result<EngineConfig> {
    match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(scenario.config.clone().unwrap_or_default()),
    }
}

fn render_text(summary: &ReplaySummary) -> String {
    let mut out = String::new();
    if let Some(name) = &summary.name {
        out.push_str(&format!("Scenario: {name}\n"));
    }
    for played in &summary.played {
        let anchor = match played.object {
            Some(id) => id.to_string(),
            None => "input".to_string(),
        };
        out.push_str(&format!(
            "[step {:>3}] {:<22} {:<28} {}\n",
            played.step,
            played.event.as_str(),
            played.description,
            anchor
        ));
    }
    out.push_str(&format!(
        "{} played, {} submitted, {} filtered, {} rejected\n",
        summary.played.len(),
        summary.submitted,
        summary.filtered,
        summary.rejected
    ));
    out
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    info!("Starting event-sounds-replay v{}", env!("CARGO_PKG_VERSION"));

    let scenario = Scenario::load(&args.scenario)?;
    let config = resolve_config(&args, &scenario)?;
    info!(
        "Replaying {} steps over {} widgets",
        scenario.steps.len(),
        scenario.widgets.len()
    );

    let local = LocalSet::new();
    let summary = local.run_until(replay::run(&scenario, config)).await?;

    match args.format {
        OutputFormat::Text => print!("{}", render_text(&summary)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }

    Ok(())
}
