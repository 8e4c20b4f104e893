//! turtle-bt: run, inspect, and check turtle behavior trees against the simulator.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use turtle_actions::{ActionCatalog, TreeDefinition, TreeSource};
use turtle_bt::{unicode_tree, BehaviourTree, Executor, Outcome, RenderOptions};
use turtle_sim::SimTurtle;

mod config;
mod console;

use config::RunnerConfig;
use console::ConsoleObserver;

/// Exit code for configuration, loading, and setup errors.
const EXIT_ERROR: u8 = 3;
const EXIT_INTERRUPTED: u8 = 130;

#[derive(Parser)]
#[command(name = "turtle-bt")]
#[command(about = "Behavior tree runner for a simulated turtle", version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Runner config (default: .turtle-bt/config.yaml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tick a tree against the simulator until it resolves
    Run {
        /// YAML definition path or builtin:<name>
        tree: TreeSource,

        /// Ticks per second
        #[arg(long)]
        tick_rate: Option<f64>,

        /// Tick budget before the run times out
        #[arg(long)]
        max_ticks: Option<u64>,

        /// Only print the initial and final tree
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print a tree's structure without running it
    Show {
        tree: TreeSource,
    },

    /// Check a tree definition and print the report as JSON
    Check {
        tree: TreeSource,
    },

    /// Print the action catalog as YAML
    Catalog,
}

fn init_logging(verbose: bool, json: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json);

    match dispatch(cli).await {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

async fn dispatch(cli: Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => RunnerConfig::load(path)?,
        None => RunnerConfig::load_from_dir(&std::env::current_dir()?)?,
    };

    match cli.command {
        Commands::Run {
            tree,
            tick_rate,
            max_ticks,
            quiet,
        } => {
            let mut config = config;
            if let Some(rate) = tick_rate {
                config.executor.tick_rate_hz = rate;
            }
            if let Some(max) = max_ticks {
                config.executor.max_ticks = max;
            }
            run(&tree, config, quiet).await
        }
        Commands::Show { tree } => {
            let definition = load(&tree)?;
            let root = definition
                .create_root()
                .with_context(|| format!("Failed to build tree {tree}"))?;
            print!(
                "{}",
                unicode_tree(&root, RenderOptions { show_status: false })
            );
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check { tree } => {
            let catalog = load_catalog(&config)?;
            let report = load(&tree)?.check(&catalog);
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(if report.valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Catalog => {
            print!("{}", load_catalog(&config)?.to_yaml()?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_catalog(config: &RunnerConfig) -> Result<ActionCatalog> {
    match &config.catalog {
        Some(path) => ActionCatalog::load(path)
            .with_context(|| format!("Failed to load catalog {}", path.display())),
        None => Ok(ActionCatalog::builtin()),
    }
}

fn load(tree: &TreeSource) -> Result<Box<dyn TreeDefinition<SimTurtle>>> {
    tree.load::<SimTurtle>()
        .with_context(|| format!("Failed to load tree {tree}"))
}

async fn run(source: &TreeSource, config: RunnerConfig, quiet: bool) -> Result<ExitCode> {
    let definition = load(source)?;
    let root = definition
        .create_root()
        .with_context(|| format!("Failed to build tree {source}"))?;

    let mut tree = BehaviourTree::new(root, SimTurtle::new(config.sim));
    let mut executor =
        Executor::new(config.executor).with_observer(Box::new(ConsoleObserver::new(quiet)));

    tracing::info!(tree = %definition.name(), "Running behavior tree");
    let report = executor
        .run(&mut tree, shutdown_signal())
        .await
        .context("Behavior tree setup failed")?;

    let turtle = tree.driver();
    let pose = turtle.current_pose();
    tracing::info!(
        x = pose.x,
        y = pose.y,
        theta = pose.theta,
        trail_segments = turtle.trail().len(),
        "Final turtle pose"
    );

    Ok(ExitCode::from(match report.outcome {
        Outcome::Success => 0,
        Outcome::Failure => 1,
        Outcome::Timeout => 2,
        Outcome::Interrupted => EXIT_INTERRUPTED,
    }))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "Ctrl-C handler unavailable; run until the tree resolves");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
