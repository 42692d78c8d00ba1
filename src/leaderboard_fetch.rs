use anyhow::{Context, Result, anyhow};
use reqwest::header::USER_AGENT;
use serde::{Deserialize, Deserializer};
use tracing::{debug, info};

use crate::http_client::http_client;

pub const DEFAULT_LEADERBOARD_URL: &str =
    "https://www.nadeshiko.io/api/leaderboard/NETWORK_ACHIEVEMENT_POINTS?page=1";

/// One row of the upstream leaderboard page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FreshPlayer {
    pub ranking: u32,
    pub tagged_name: String,
    pub uuid: String,
    #[serde(deserialize_with = "de_points")]
    pub value: f64,
}

#[derive(Debug, Deserialize)]
struct LeaderboardResponse {
    #[serde(default)]
    data: Vec<FreshPlayer>,
}

pub fn fetch_leaderboard(url: &str, timeout_secs: u64) -> Result<Vec<FreshPlayer>> {
    let client = http_client(timeout_secs)?;

    info!(%url, "fetching leaderboard");
    let resp = client
        .get(url)
        .header(USER_AGENT, "Mozilla/5.0")
        .send()
        .context("leaderboard request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading leaderboard body")?;
    if !status.is_success() {
        return Err(anyhow!("http {}: {}", status, body));
    }
    debug!(bytes = body.len(), "leaderboard body received");

    parse_leaderboard_json(&body)
}

pub fn parse_leaderboard_json(raw: &str) -> Result<Vec<FreshPlayer>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let resp: LeaderboardResponse =
        serde_json::from_str(trimmed).context("invalid leaderboard json")?;
    Ok(resp.data)
}

// Upstream sends AP as a numeric string ("12345"); accept plain numbers too.
fn de_points<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Points {
        Num(f64),
        Text(String),
    }

    let n = match Points::deserialize(deserializer)? {
        Points::Num(n) => n,
        Points::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("non-numeric points value {s:?}")))?,
    };
    // NaN and infinities would be written to the store as `null`.
    if !n.is_finite() {
        return Err(serde::de::Error::custom(format!("non-finite points value {n}")));
    }
    Ok(n)
}
