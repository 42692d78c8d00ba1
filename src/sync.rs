use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::info;

use crate::config::SyncConfig;
use crate::leaderboard_fetch::{FreshPlayer, fetch_leaderboard};
use crate::names::clean_display_name;
use crate::output::{OutputMode, ProcessedPlayer, UNKNOWN_COUNTRY, shape};
use crate::snapshot::{is_new_month, reconcile, reset_snapshot};
use crate::store::{JsonFileStore, StoreDocument};

#[derive(Debug, Clone, PartialEq)]
pub struct SyncSummary {
    pub mode: OutputMode,
    pub players_fetched: usize,
    pub snapshot_reset: bool,
    pub newly_tracked: usize,
    pub output_rows: usize,
    pub last_update: String,
}

/// Load, fetch, merge, write. Any failure past the load aborts the run with
/// the store untouched on disk.
pub fn run_sync(cfg: &SyncConfig) -> Result<SyncSummary> {
    let store = JsonFileStore::new(&cfg.store_path);
    let mut doc = store.load();

    let players = fetch_leaderboard(&cfg.leaderboard_url, cfg.request_timeout_secs)
        .context("fetch leaderboard")?;
    info!(players = players.len(), "leaderboard fetched");

    let summary = apply_leaderboard(&mut doc, &players, cfg.output_mode, Utc::now())?;
    store.save(&doc)?;
    info!(path = %store.path().display(), "store written");
    Ok(summary)
}

/// Merge one fetched page into `doc` in memory. Touches the snapshot, the
/// timestamp and the mode's collection; the country mapping is only read.
pub fn apply_leaderboard(
    doc: &mut StoreDocument,
    players: &[FreshPlayer],
    mode: OutputMode,
    now: DateTime<Utc>,
) -> Result<SyncSummary> {
    let snapshot_reset = is_new_month(doc.last_update_time(), now);
    if snapshot_reset {
        info!("new month; resetting snapshots");
        reset_snapshot(&mut doc.month_start_snapshot, players);
    }

    let (processed, newly_tracked) = process_players(doc, players);

    let (collection, output_rows) = shape(mode, &processed)?;
    doc.set_collection(mode.collection_key(), collection);
    doc.stamp(now);

    Ok(SyncSummary {
        mode,
        players_fetched: players.len(),
        snapshot_reset,
        newly_tracked,
        output_rows,
        last_update: doc.last_update.clone().unwrap_or_default(),
    })
}

fn process_players(doc: &mut StoreDocument, players: &[FreshPlayer]) -> (Vec<ProcessedPlayer>, usize) {
    let mut newly_tracked = 0;
    let mut out = Vec::with_capacity(players.len());
    for p in players {
        let baseline = reconcile(&mut doc.month_start_snapshot, p);
        if baseline.newly_tracked {
            newly_tracked += 1;
        }
        let country = doc
            .country_for(&p.uuid)
            .unwrap_or(UNKNOWN_COUNTRY)
            .to_string();
        out.push(ProcessedPlayer {
            rank: p.ranking,
            name: clean_display_name(&p.tagged_name),
            uuid: p.uuid.clone(),
            country,
            current_ap: p.value,
            start_ap: baseline.start_ap,
            monthly_gain: baseline.gain(p.value),
        });
    }
    (out, newly_tracked)
}
