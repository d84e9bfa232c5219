mod config;
mod session;

use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ep_core::{
    Act, Correlator, EngineConfig, EvidenceGrade, ObjectAsMeant, Record, TemporalWindow,
};
use serde_json::json;

use crate::session::{Session, reduce_batch};

#[derive(Parser)]
#[command(
    name = "ep",
    about = "Drive the correlation, temporal window and reduction engines"
)]
struct Cli {
    /// Config file (TOML). Falls back to $EP_CONFIG, then built-in defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a JSONL file of events, printing one JSON line per event
    Run {
        /// Events file, or `-` for stdin
        events: PathBuf,
    },

    /// Reduce a JSON array of records and report invariant keys
    Reduce {
        /// JSON file holding an array of objects
        records: PathBuf,
    },

    /// Run the built-in perception and anticipation scenarios
    Demo,

    /// Print the effective configuration as TOML
    Config,
}

/// Log filter override; falls back to `RUST_LOG`, then warnings only.
const LOG_ENV: &str = "EP_LOG";

/// Engine logs go to stderr so stdout stays pure JSON. `--verbose` turns on
/// debug output for the engines and the CLI regardless of the environment.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let directives = if verbose {
        "ep=debug,ep_core=debug".to_string()
    } else {
        std::env::var(LOG_ENV)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "warn".to_string())
    };
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .with_target(verbose)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = config::load_config(cli.config.as_deref());

    match &cli.command {
        Commands::Run { events } => cmd_run(&cli, &config, events),
        Commands::Reduce { records } => cmd_reduce(&config, records),
        Commands::Demo => cmd_demo(&config),
        Commands::Config => cmd_config(&config),
    }
}

fn open_input(path: &Path) -> Result<Box<dyn BufRead>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

fn cmd_run(cli: &Cli, config: &EngineConfig, events: &Path) -> Result<()> {
    let input = open_input(events)?;
    let mut session = Session::new(config);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let applied = session.run(input, |value| {
        writeln!(out, "{}", serde_json::to_string(value)?)?;
        Ok(())
    })?;

    if cli.verbose {
        let summary = session.window().stream_summary();
        eprintln!(
            "--- events={applied}, records={}, fulfilled={}, flow={}, retained={}, bracketed={} ---",
            session.correlator().len(),
            session.correlator().fulfilled_count(),
            summary.flow_length,
            summary.retention_depth,
            session.reduction().reduction_depth(),
        );
    }
    Ok(())
}

fn cmd_reduce(config: &EngineConfig, path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let records: Vec<Record> = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of objects", path.display()))?;

    let report = reduce_batch(config, &records)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_demo(config: &EngineConfig) -> Result<()> {
    let mut correlator = Correlator::new();
    let act = Act::new("perceiving", "positing", 0.9, EvidenceGrade::Adequate);
    let mut sphere = ObjectAsMeant::new("red sphere", "perceptual", 0.7)
        .with_temporal_index(ep_core::time::now_iso8601());
    sphere.add_horizon("inner_texture", ["smooth", "rough", "matte"]);
    sphere.add_horizon("background", ["table", "shelf", "floor"]);

    let experience = correlator.constitute(&act, &sphere);
    let analysis = Correlator::horizonal_analysis(&sphere);

    let mut window = TemporalWindow::from_config(&config.window);
    window.protend("greeting", 0.8);
    let moment = window.impress("hello world", json!({"speaker": "visitor"}));

    let report = json!({
        "perception": {
            "experience": serde_json::to_value(&experience)?,
            "horizons": serde_json::to_value(&analysis)?,
        },
        "anticipation": serde_json::to_value(&moment)?,
        "stream": serde_json::to_value(window.stream_summary())?,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_config(config: &EngineConfig) -> Result<()> {
    print!("{}", config::to_toml(config)?);
    Ok(())
}
