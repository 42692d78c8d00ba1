use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use ap_leaderboard::config::SyncConfig;
use ap_leaderboard::sync::run_sync;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(env).init();

    let cfg = SyncConfig::from_env_and_args()?;
    info!(mode = %cfg.output_mode, store = %cfg.store_path.display(), "starting leaderboard update");

    let summary = run_sync(&cfg)?;

    println!("Leaderboard update complete");
    println!("Store: {}", cfg.store_path.display());
    println!("Mode: {}", summary.mode);
    println!("Players fetched: {}", summary.players_fetched);
    if summary.snapshot_reset {
        println!("New month: snapshots reset");
    } else if summary.newly_tracked > 0 {
        println!("Newly tracked players: {}", summary.newly_tracked);
    }
    println!("Output rows: {}", summary.output_rows);
    println!("Last update: {}", summary.last_update);

    Ok(())
}
