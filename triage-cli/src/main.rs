use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use triage_core::{PriorityEngine, Strategy};

mod config;
mod render;
mod state;
mod time;

#[derive(Parser, Debug)]
#[command(
    name = "triage",
    version,
    long_version = env!("TRIAGE_LONG_VERSION"),
    about = "Rank tasks by urgency, importance, effort and dependencies"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score and rank every task in a file
    Analyze(RunArgs),

    /// Show the top few tasks to work on next, with reasons
    Suggest {
        #[command(flatten)]
        run: RunArgs,

        /// Number of suggestions (default: [engine].suggestion_count)
        #[arg(long)]
        count: Option<usize>,
    },

    /// List the preset strategies and their weights
    Strategies,

    /// Manage ~/.triage/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Task file (.json or .csv)
    #[arg(long)]
    tasks: PathBuf,

    /// Weighting strategy (default: [engine].strategy)
    #[arg(long, value_parser = parse_strategy)]
    strategy: Option<Strategy>,

    /// Reference date, YYYY-MM-DD (default: today in [calendar].timezone)
    #[arg(long)]
    today: Option<String>,

    /// Measure urgency in calendar days instead of working days
    #[arg(long)]
    no_working_days: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file if none exists
    Init,
    /// Print the effective configuration
    Show,
}

fn parse_strategy(s: &str) -> Result<Strategy> {
    s.parse()
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Analyze(run) => {
            let cfg = config::load_config()?;
            let (engine, raw, strategy) = prepare(&run, &cfg)?;
            let result = engine.analyze(&raw, Some(&strategy));
            if run.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", render::render_analysis(&result));
            }
        }

        Command::Suggest { run, count } => {
            let cfg = config::load_config()?;
            let (engine, raw, strategy) = prepare(&run, &cfg)?;
            let count = count.unwrap_or(cfg.engine.suggestion_count);
            let result = engine.suggest(&raw, Some(&strategy), count);
            if run.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", render::render_suggestions(&result));
            }
        }

        Command::Strategies => {
            println!(
                "{:<16} {:>8} {:>11} {:>7} {:>11}",
                "STRATEGY", "URGENCY", "IMPORTANCE", "EFFORT", "DEPENDENCY"
            );
            for s in Strategy::ALL {
                let w = s.weights();
                println!(
                    "{:<16} {:>8.2} {:>11.2} {:>7.2} {:>11.2}",
                    w.name, w.urgency, w.importance, w.effort, w.dependency
                );
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },
    }

    Ok(())
}

/// Build the engine from config plus flags, and load the raw batch.
///
/// The strategy is handed to the engine as a raw value so a bad name in
/// config.toml degrades to smart_balance with a warning, like any request.
fn prepare(run: &RunArgs, cfg: &config::Config) -> Result<(PriorityEngine, Value, Value)> {
    let today = time::resolve_today(run.today.as_deref(), &cfg.calendar.timezone)?;
    let calendar = cfg.calendar.to_calendar()?;
    let working_days = cfg.engine.working_days && !run.no_working_days;

    let strategy = match run.strategy {
        Some(s) => s.name().to_string(),
        None => cfg.engine.strategy.clone(),
    };

    let raw = triage_ingest::load_tasks(&run.tasks)
        .with_context(|| format!("loading tasks from {}", run.tasks.display()))?;

    debug!(%today, working_days, %strategy, "prepared engine");
    let engine = PriorityEngine::new(today)
        .with_calendar(calendar)
        .with_working_days(working_days);
    Ok((engine, raw, Value::String(strategy)))
}
