//! arena-night: an Arenaloop orchestrator driving a lobby of bots.
//!
//! ```text
//! cargo run -p arena-night -- --players 6 --config demos/arena-night/arena-night.json
//! ```

mod events;
mod lobby;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use arenaloop::prelude::*;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::lobby::{Bots, SimBridge};

#[derive(Parser, Debug)]
#[command(name = "arena-night", version, about)]
struct Cli {
    /// JSON configuration file. Without one, a built-in config is used.
    #[arg(short, long, env = "ARENA_NIGHT_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Number of simulated players.
    #[arg(short, long, default_value_t = 4)]
    players: u64,

    /// Seed for rest lengths and event selection.
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "arena-night failed");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

async fn run(cli: Cli) -> Result<(), ArenaloopError> {
    let config = match &cli.config {
        Some(path) => OrchestratorConfig::from_json_file(path)?,
        None => builtin_config(),
    };

    let (roster, joins) = SharedRoster::new();
    let roster = Arc::new(roster);
    let notifier = Arc::new(ChannelNotifier::new());
    let bridge = Arc::new(SimBridge::new(Arc::clone(&roster)));

    let mut builder = Orchestrator::builder(config)
        .modules(events::sources())
        .notifier(notifier.clone())
        .bridge(bridge)
        .roster(roster.clone(), joins);
    if let Some(seed) = cli.seed {
        builder = builder.seed(seed);
    }
    let orchestrator = builder.build()?;

    let bots = Bots::new(roster, notifier);
    tokio::spawn(bots.clone().arrive(cli.players));
    tokio::spawn(bots.simulate());

    tokio::select! {
        () = orchestrator.run() => {}
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::warn!(error = %e, "failed to listen for ctrl-c");
            }
            tracing::info!("shutting down");
        }
    }
    Ok(())
}

fn builtin_config() -> OrchestratorConfig {
    let floor = Region::from_corners(Vec3::new(-40.0, -1.0, -40.0), Vec3::new(40.0, 20.0, 40.0));
    OrchestratorConfig {
        director: DirectorConfig {
            rest_min_secs: 8,
            rest_max_secs: 15,
            min_players: 2,
            ..DirectorConfig::default()
        },
        arenas: vec![ArenaTemplate::new(events::LAVA_ARENA, vec![floor])],
    }
}
