use std::time::Duration;

use clap::Parser;
use log::info;

use intersection_sim::simulation::{SimConfig, SimWorld};

#[derive(Parser)]
#[command(name = "intersection_sim")]
#[command(about = "Adaptive four-way intersection simulation")]
struct Cli {
    /// Number of simulation ticks to run
    #[arg(long, default_value = "2000")]
    ticks: u64,

    /// Seed for a reproducible run; omit for OS entropy
    #[arg(long)]
    seed: Option<u64>,

    /// Advisory request timeout in milliseconds
    #[arg(long, default_value = "200")]
    advisory_timeout_ms: u64,

    /// Print a summary every this many ticks (0 disables)
    #[arg(long, default_value = "200")]
    summary_every: u64,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let config = SimConfig {
        advisory_timeout: Duration::from_millis(cli.advisory_timeout_ms),
        ..SimConfig::default()
    };

    let mut world = match cli.seed {
        Some(seed) => SimWorld::new_with_seed(config, seed),
        None => SimWorld::new(config),
    };

    info!("running {} ticks", cli.ticks);

    for tick in 1..=cli.ticks {
        world.tick();
        if cli.summary_every > 0 && tick % cli.summary_every == 0 {
            world.print_summary();
            println!();
        }
    }

    println!("=== Final State ===");
    world.print_summary();
}
