use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::http_client::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::leaderboard_fetch::DEFAULT_LEADERBOARD_URL;
use crate::output::OutputMode;
use crate::store::DEFAULT_STORE_FILE;

pub const ENV_URL: &str = "AP_LEADERBOARD_URL";
pub const ENV_STORE_PATH: &str = "AP_STORE_PATH";
pub const ENV_OUTPUT_MODE: &str = "AP_OUTPUT_MODE";
pub const ENV_TIMEOUT_SECS: &str = "AP_REQUEST_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq)]
pub struct SyncConfig {
    pub leaderboard_url: String,
    pub store_path: PathBuf,
    pub output_mode: OutputMode,
    pub request_timeout_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            leaderboard_url: DEFAULT_LEADERBOARD_URL.to_string(),
            store_path: PathBuf::from(DEFAULT_STORE_FILE),
            output_mode: OutputMode::default(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl SyncConfig {
    /// Process environment, then command-line flags on top.
    pub fn from_env_and_args() -> Result<Self> {
        let args = std::env::args().skip(1).collect::<Vec<_>>();
        Self::resolve(|key| std::env::var(key).ok(), &args)
    }

    pub fn resolve(env: impl Fn(&str) -> Option<String>, args: &[String]) -> Result<Self> {
        let mut cfg = Self::default();

        if let Some(url) = non_empty(env(ENV_URL)) {
            cfg.leaderboard_url = url;
        }
        if let Some(path) = non_empty(env(ENV_STORE_PATH)) {
            cfg.store_path = PathBuf::from(path);
        }
        if let Some(mode) = non_empty(env(ENV_OUTPUT_MODE)) {
            cfg.output_mode = mode.parse::<OutputMode>().context(ENV_OUTPUT_MODE)?;
        }
        if let Some(secs) = env(ENV_TIMEOUT_SECS).and_then(|v| v.trim().parse::<u64>().ok()) {
            cfg.request_timeout_secs = secs.max(1);
        }

        if let Some(url) = arg_value(args, "--url") {
            cfg.leaderboard_url = url;
        }
        if let Some(path) = arg_value(args, "--store") {
            cfg.store_path = PathBuf::from(path);
        }
        if let Some(mode) = arg_value(args, "--mode") {
            cfg.output_mode = mode.parse::<OutputMode>().context("--mode")?;
        }

        Ok(cfg)
    }
}

/// `--flag=value` or `--flag value`; blank values are skipped.
fn arg_value(args: &[String], flag: &str) -> Option<String> {
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
