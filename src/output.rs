use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use serde_json::Value;

pub const FLAT_TOP_LIMIT: usize = 100;
pub const COUNTRY_SCORE_DEPTH: usize = 5;
pub const UNKNOWN_COUNTRY: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    FlatTopN,
    FlatFull,
    CountryGrouped,
}

impl OutputMode {
    /// Top-level store field the front end reads for this mode.
    pub fn collection_key(self) -> &'static str {
        match self {
            OutputMode::FlatTopN => "global_top_100",
            OutputMode::FlatFull => "players",
            OutputMode::CountryGrouped => "countries",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutputMode::FlatTopN => "flat-top-n",
            OutputMode::FlatFull => "flat-full",
            OutputMode::CountryGrouped => "country-grouped",
        };
        f.write_str(s)
    }
}

impl FromStr for OutputMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat-top-n" => Ok(OutputMode::FlatTopN),
            "flat-full" => Ok(OutputMode::FlatFull),
            "country-grouped" => Ok(OutputMode::CountryGrouped),
            other => Err(anyhow!(
                "unknown output mode {other:?} (expected flat-top-n, flat-full or country-grouped)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedPlayer {
    pub rank: u32,
    pub name: String,
    pub uuid: String,
    pub country: String,
    pub current_ap: f64,
    pub start_ap: f64,
    pub monthly_gain: f64,
}

#[derive(Debug, Serialize)]
struct TopRow<'a> {
    rank: u32,
    name: &'a str,
    uuid: &'a str,
    ap: f64,
    monthly_gain: f64,
    country: &'a str,
}

#[derive(Debug, Serialize)]
struct FullRow<'a> {
    username: &'a str,
    uuid: &'a str,
    country: &'a str,
    current_ap: f64,
    last_month_ap: f64,
    monthly_gain: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedRow {
    pub username: String,
    pub uuid: String,
    pub current_ap: f64,
    pub last_month_ap: f64,
    pub gain: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryAggregate {
    pub country: String,
    pub score: f64,
    pub top_players: Vec<GroupedRow>,
}

/// Build the output collection for `mode`. Returns the value plus its row count.
pub fn shape(mode: OutputMode, players: &[ProcessedPlayer]) -> Result<(Value, usize)> {
    match mode {
        OutputMode::FlatTopN => {
            let rows = players
                .iter()
                .take(FLAT_TOP_LIMIT)
                .map(|p| TopRow {
                    rank: p.rank,
                    name: &p.name,
                    uuid: &p.uuid,
                    ap: p.current_ap,
                    monthly_gain: p.monthly_gain,
                    country: &p.country,
                })
                .collect::<Vec<_>>();
            let n = rows.len();
            Ok((serde_json::to_value(rows).context("serialize top rows")?, n))
        }
        OutputMode::FlatFull => {
            let rows = players
                .iter()
                .map(|p| FullRow {
                    username: &p.name,
                    uuid: &p.uuid,
                    country: &p.country,
                    current_ap: p.current_ap,
                    last_month_ap: p.start_ap,
                    monthly_gain: p.monthly_gain,
                })
                .collect::<Vec<_>>();
            let n = rows.len();
            Ok((serde_json::to_value(rows).context("serialize player rows")?, n))
        }
        OutputMode::CountryGrouped => {
            let groups = group_by_country(players);
            let n = groups.len();
            Ok((serde_json::to_value(groups).context("serialize country groups")?, n))
        }
    }
}

/// Countries in order of first appearance; callers sort by score if they care.
pub fn group_by_country(players: &[ProcessedPlayer]) -> Vec<CountryAggregate> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<CountryAggregate> = Vec::new();

    for p in players {
        let slot = *index.entry(p.country.as_str()).or_insert_with(|| {
            groups.push(CountryAggregate {
                country: p.country.clone(),
                score: 0.0,
                top_players: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].top_players.push(GroupedRow {
            username: p.name.clone(),
            uuid: p.uuid.clone(),
            current_ap: p.current_ap,
            last_month_ap: p.start_ap,
            gain: p.monthly_gain,
        });
    }

    for g in &mut groups {
        // Stable: tied players keep upstream order.
        g.top_players
            .sort_by(|a, b| b.current_ap.total_cmp(&a.current_ap));
        g.score = country_score(&g.top_players);
    }
    groups
}

/// Top-5 sum over 5, even when the country has fewer than 5 players.
pub fn country_score(sorted_players: &[GroupedRow]) -> f64 {
    let sum: f64 = sorted_players
        .iter()
        .take(COUNTRY_SCORE_DEPTH)
        .map(|p| p.current_ap)
        .sum();
    sum / COUNTRY_SCORE_DEPTH as f64
}
