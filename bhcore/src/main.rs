use bhcore::{bench_gravity, ScenarioConfig, World};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file under `scenarios/`
    #[arg(short, default_value = "two_body.yaml")]
    file_name: String,

    /// Override the tick count from the scenario
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Run the direct vs Barnes–Hut timing sweep instead
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    ScenarioConfig::load(&config_path)
        .with_context(|| format!("failed to load scenario {}", config_path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    if args.bench {
        bench_gravity(&[200, 400, 800, 1600, 3200, 6400])?;
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let mut world = World::build_world(&scenario_cfg)?;
    let ticks = args.ticks.unwrap_or(world.engine().ticks);

    world.run(ticks)?;

    info!(
        ticks = world.tick,
        max_speed = world.max_speed(),
        momentum = ?world.total_momentum(),
        center_of_mass = ?world.center_of_mass(),
        "simulation finished"
    );

    Ok(())
}
