//! topo - replay scripted interaction sessions against the containment core.
//!
//! Feeds a timed list of JSON commands through a fresh editor and prints
//! the resulting diagram, which makes drag/expand/exit behavior easy to
//! reproduce outside a UI.

mod logger;
mod script;

use anyhow::{Context, Result};
use api::{execute_query, Query, QueryResult};
use clap::{Parser, Subcommand, ValueEnum};
use containment::{Editor, EditorConfig};
use log::LevelFilter;
use logger::TopoLogger;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// topo - drive the topology editor core from the command line
#[derive(Parser)]
#[command(name = "topo")]
#[command(about = "Replay interaction scripts against the topology editor core")]
struct Cli {
    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,

    /// Append log lines to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run a script and print the final nodes as JSON
    Replay {
        /// Script file: a JSON array of {"at_ms", "command"} steps
        script: PathBuf,

        /// Editor configuration (JSON); defaults are used for missing fields
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Run timers still pending after the last step
        #[arg(long)]
        settle: bool,
    },

    /// Print the default editor configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    TopoLogger::init(cli.log_level.into(), cli.log_file.as_deref())?;

    match cli.command {
        Commands::Replay {
            script,
            config,
            settle,
        } => run_replay(&script, config.as_deref(), settle),
        Commands::Config => print_config(),
    }
}

fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    let Some(path) = path else {
        return Ok(EditorConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config: EditorConfig = serde_json::from_str(&text)
        .with_context(|| format!("Invalid config: {}", path.display()))?;
    Ok(config)
}

fn run_replay(path: &Path, config: Option<&Path>, settle: bool) -> Result<()> {
    let config = load_config(config)?;
    let steps = script::load(path)?;
    log::info!("replaying {} steps from {}", steps.len(), path.display());

    let mut editor = Editor::new(config);
    let start = Instant::now();
    let outcome = script::replay(&mut editor, steps, start, settle);
    log::info!(
        "{} steps executed, {} rejected, {} timers fired",
        outcome.executed,
        outcome.failed,
        outcome.timers
    );

    let nodes = match execute_query(&editor, Query::GetAllNodes, start) {
        QueryResult::Nodes { nodes } => nodes,
        other => anyhow::bail!("unexpected query result: {:?}", other),
    };
    println!("{}", serde_json::to_string_pretty(&nodes)?);
    Ok(())
}

fn print_config() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&EditorConfig::default())?);
    Ok(())
}
