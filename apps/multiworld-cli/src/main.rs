use anyhow::Context;
use clap::{Parser, Subcommand};
use multiworld_bootstrap::{Bootstrap, BootstrapConfig, CustomWorld};
use multiworld_common::{Registry, SystemId};
use multiworld_kernel::{PlanStep, Universe};
use multiworld_tools::{UniverseInspector, UniverseReport};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "multiworld-cli", about = "CLI tool for multiworld bootstrap")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Run the bootstrap and print every world graph
    Plan {
        /// System descriptor table (.yaml, .yml or .json)
        #[arg(short, long)]
        registry: PathBuf,
        /// Bootstrap configuration (.yaml, .yml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Emit a JSON report instead of text
        #[arg(long)]
        json: bool,
    },
    /// Run the bootstrap and only report whether it succeeds
    Check {
        #[arg(short, long)]
        registry: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct CustomWorldReport<'a> {
    name: &'a str,
    explicit: Vec<&'a SystemId>,
    filtered: Vec<&'a SystemId>,
    duplicated: Vec<&'a SystemId>,
    systems_to_create: &'a [SystemId],
}

impl<'a> CustomWorldReport<'a> {
    fn new(world: &'a CustomWorld) -> Self {
        Self {
            name: world.name(),
            explicit: world.explicit().iter().collect(),
            filtered: world.filtered().iter().collect(),
            duplicated: world.duplicated().iter().collect(),
            systems_to_create: world.systems_to_create(),
        }
    }
}

#[derive(Serialize)]
struct PlanReport<'a> {
    default_systems: &'a [SystemId],
    custom_worlds: Vec<CustomWorldReport<'a>>,
    universe: UniverseReport,
    execution_plan: Vec<PlanStep>,
}

fn load_inputs(registry: &Path, config: Option<&Path>) -> anyhow::Result<(Registry, BootstrapConfig)> {
    let registry = Registry::load(registry)
        .with_context(|| format!("loading registry {}", registry.display()))?;
    let config = match config {
        Some(path) => BootstrapConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => BootstrapConfig::default(),
    };
    Ok((registry, config))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match cli.command {
        Commands::Info => {
            println!("multiworld-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", multiworld_common::crate_info());
            println!("bootstrap: {}", multiworld_bootstrap::crate_info());
            println!("tools: {}", multiworld_tools::crate_info());
            println!("default world: {}", Universe::default().default_world_name());
        }
        Commands::Plan {
            registry,
            config,
            json,
        } => {
            let (registry, config) = load_inputs(&registry, config.as_deref())?;
            let mut universe = config.universe();
            let mut bootstrap = Bootstrap::from_config(&config)?;
            let defaults = bootstrap
                .initialize(&registry, &mut universe)
                .context("bootstrap failed")?
                .clone();
            let plan = universe.execution_plan();

            if json {
                let report = PlanReport {
                    default_systems: defaults.as_slice(),
                    custom_worlds: bootstrap
                        .custom_worlds()
                        .iter()
                        .map(CustomWorldReport::new)
                        .collect(),
                    universe: UniverseInspector::report(&universe),
                    execution_plan: plan,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            for world in universe.worlds() {
                println!("{}", UniverseInspector::summary(world));
                print!("{}", UniverseInspector::tree(world));
                println!();
            }
            println!("Default systems ({}):", defaults.len());
            for id in defaults.iter() {
                println!("  {id}");
            }
            println!("Execution plan:");
            for line in UniverseInspector::plan_lines(&plan) {
                println!("  {line}");
            }
        }
        Commands::Check { registry, config } => {
            let (registry, config) = load_inputs(&registry, config.as_deref())?;
            let mut universe = config.universe();
            let mut bootstrap = Bootstrap::from_config(&config)?;
            let default_count = bootstrap
                .initialize(&registry, &mut universe)
                .context("bootstrap failed")?
                .len();
            tracing::info!(
                worlds = universe.world_count(),
                default_systems = default_count,
                "bootstrap ok"
            );
            println!(
                "OK: {} custom worlds, {} default systems",
                bootstrap.custom_worlds().len(),
                default_count
            );
        }
    }

    Ok(())
}
