#![warn(missing_docs)]
//! Hackstats CLI Library
//!
//! Command-line driver for the hackstats scenarios: each one answers a
//! classic statistics question by simulation instead of a formula.
//!
//! # Example
//!
//! ```ignore
//! fn main() -> anyhow::Result<()> {
//!     hackstats_cli::run()
//! }
//! ```

mod config;
mod executor;
mod planner;
mod scenarios;

pub use config::*;
pub use executor::{Executor, build_report, format_human_output};
pub use planner::{ExecutionPlan, build_plan};
pub use scenarios::*;

use clap::{Parser, Subcommand};
use hackstats_report::{OutputFormat, Report, generate_csv_report, generate_json_report};
use hackstats_stats::Tail;
use rayon::ThreadPoolBuilder;
use regex::Regex;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Hackstats CLI arguments
#[derive(Parser, Debug)]
#[command(name = "hackstats")]
#[command(author, version, about = "Hackstats - statistics by simulation")]
pub struct Cli {
    /// Optional subcommand (List, Run, Init); defaults to Run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Filter scenarios by regex pattern
    #[arg(default_value = ".*")]
    pub filter: String,

    /// Output format: human, json, csv
    #[arg(long)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Run scenarios using this resampling method only
    #[arg(long)]
    pub method: Option<String>,

    /// Trials per simulation, overriding each scenario's default
    #[arg(long, short = 'n')]
    pub iterations: Option<usize>,

    /// Seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Tail for every p-value: greater, greater-equal, less, less-equal
    #[arg(long)]
    pub tail: Option<Tail>,

    /// Confidence level for percentile intervals
    #[arg(long)]
    pub confidence: Option<f64>,

    /// Run trials on the calling thread only
    #[arg(long)]
    pub serial: bool,

    /// Number of threads for parallel trials
    /// 0 = use all available cores (default), 1 = single-threaded
    #[arg(long, short = 'j', default_value = "0")]
    pub threads: usize,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all registered scenarios
    List,
    /// Run scenarios (default)
    Run,
    /// Write a default hackstats.toml to the current directory
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run the Hackstats CLI with the process arguments.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the Hackstats CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.verbose);

    // Discover hackstats.toml configuration (CLI flags override)
    let config = HackConfig::discover().unwrap_or_default();

    match cli.command {
        Some(Commands::List) => list_scenarios(&cli),
        Some(Commands::Init { force }) => init_config(force),
        Some(Commands::Run) | None => run_scenarios(&cli, &config),
    }
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "hackstats=debug"
    } else {
        "hackstats=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    // Reports go to stdout; logs stay on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

/// Filter scenarios based on CLI options using the planner module.
fn filter_scenarios(cli: &Cli) -> anyhow::Result<Vec<&'static ScenarioDef>> {
    let filter_re = Regex::new(&cli.filter)
        .map_err(|e| anyhow::anyhow!("invalid filter '{}': {}", cli.filter, e))?;
    let plan = build_plan(registry(), Some(&filter_re), cli.method.as_deref());
    Ok(plan.scenarios)
}

fn list_scenarios(cli: &Cli) -> anyhow::Result<()> {
    println!("Hackstats Plan:");

    let scenarios = filter_scenarios(cli)?;
    for scenario in &scenarios {
        println!("├── {} [{}]", scenario.id, scenario.method);
        println!("│   └── {}", scenario.title);
    }
    println!("{} scenarios found.", scenarios.len());

    Ok(())
}

fn init_config(force: bool) -> anyhow::Result<()> {
    let path = PathBuf::from(CONFIG_FILE_NAME);
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    std::fs::write(&path, HackConfig::default_toml())?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Build the scenario context by layering: hackstats.toml defaults → CLI overrides.
fn build_context(cli: &Cli, config: &HackConfig) -> anyhow::Result<ScenarioContext> {
    let confidence_level = cli.confidence.unwrap_or(config.runner.confidence_level);
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        anyhow::bail!("confidence level must lie in (0, 1), got {}", confidence_level);
    }

    Ok(ScenarioContext {
        iterations: cli.iterations.or(config.runner.iterations),
        seed: cli.seed.or(config.runner.seed),
        parallel: !cli.serial && config.runner.parallel,
        tail: cli.tail.or(config.runner.tail),
        confidence_level,
    })
}

/// Output format: CLI flag, else hackstats.toml
fn resolve_format(cli: &Cli, config: &HackConfig) -> anyhow::Result<OutputFormat> {
    cli.format
        .as_deref()
        .unwrap_or(&config.output.format)
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))
}

fn run_scenarios(cli: &Cli, config: &HackConfig) -> anyhow::Result<()> {
    // Configure Rayon thread pool: CLI wins if set, else hackstats.toml
    let threads = if cli.threads > 0 {
        Some(cli.threads)
    } else {
        config.runner.threads
    };
    if let Some(n) = threads {
        ThreadPoolBuilder::new().num_threads(n).build_global().ok();
    }

    let format = resolve_format(cli, config)?;

    let scenarios = filter_scenarios(cli)?;
    if scenarios.is_empty() {
        println!("No scenarios found.");
        return Ok(());
    }

    let context = build_context(cli, config)?;
    tracing::info!(
        scenarios = scenarios.len(),
        parallel = context.parallel,
        threads = threads.unwrap_or(0),
        "starting run"
    );

    let start_time = Instant::now();
    let executor = Executor::new(context);
    let results = executor.execute(&scenarios);
    let total_duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;
    let report = build_report(results, executor.context(), total_duration_ms);

    let output = render(&report, format)?;

    // Write output
    let output_path = cli
        .output
        .clone()
        .or_else(|| config.output.path.as_ref().map(PathBuf::from));
    if let Some(path) = output_path {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::File::create(&path)?;
        file.write_all(output.as_bytes())?;
        println!("Report written to: {}", path.display());
    } else {
        print!("{}", output);
    }

    // Exit with appropriate code
    if report.summary.failed > 0 {
        eprintln!("\n{} scenario(s) failed", report.summary.failed);
        std::process::exit(1);
    }

    Ok(())
}

fn render(report: &Report, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => generate_json_report(report)?,
        OutputFormat::Csv => generate_csv_report(report),
        OutputFormat::Human => format_human_output(report),
    })
}
