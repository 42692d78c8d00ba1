use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};

use crate::leaderboard_fetch::FreshPlayer;

/// Month-of-year comparison only; the year is ignored, so a run exactly a
/// whole number of years after the last one is not treated as a new month.
/// `None` (unparseable stamp) always counts as a new month.
pub fn is_new_month(last_update: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match last_update {
        Some(last) => last.month0() != now.month0(),
        None => true,
    }
}

/// Throw away the old baseline and record everyone's current AP.
pub fn reset_snapshot(snapshot: &mut BTreeMap<String, f64>, players: &[FreshPlayer]) {
    snapshot.clear();
    for p in players {
        snapshot.insert(p.uuid.clone(), p.value);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
    pub start_ap: f64,
    pub newly_tracked: bool,
}

impl Baseline {
    pub fn gain(&self, current_ap: f64) -> f64 {
        current_ap - self.start_ap
    }
}

/// Start-of-month AP for `player`, inserting the current value when the
/// player has no entry yet. Presence is what counts: a stored `0` is a real
/// baseline, not a gap to be refilled with today's value.
pub fn reconcile(snapshot: &mut BTreeMap<String, f64>, player: &FreshPlayer) -> Baseline {
    if let Some(start_ap) = snapshot.get(&player.uuid) {
        return Baseline {
            start_ap: *start_ap,
            newly_tracked: false,
        };
    }
    snapshot.insert(player.uuid.clone(), player.value);
    Baseline {
        start_ap: player.value,
        newly_tracked: true,
    }
}
