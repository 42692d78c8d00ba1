use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

pub const DEFAULT_STORE_FILE: &str = "ap_hunters_data.json";

/// The whole persisted document. Unknown top-level fields (including the
/// collections other output modes write) ride along in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    /// UUID -> country code. Curated by hand; kept exactly as loaded.
    #[serde(default)]
    pub manual_country_mapping: Map<String, Value>,
    #[serde(default, deserialize_with = "de_snapshot")]
    pub month_start_snapshot: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StoreDocument {
    pub fn country_for(&self, uuid: &str) -> Option<&str> {
        self.manual_country_mapping
            .get(uuid)
            .and_then(Value::as_str)
            .filter(|c| !c.is_empty())
    }

    /// `Some` when `last_update` is absent or parses; absent means the epoch.
    pub fn last_update_time(&self) -> Option<DateTime<Utc>> {
        match self.last_update.as_deref() {
            None => Some(DateTime::<Utc>::UNIX_EPOCH),
            Some(raw) => DateTime::parse_from_rfc3339(raw.trim())
                .ok()
                .map(|t| t.with_timezone(&Utc)),
        }
    }

    pub fn stamp(&mut self, now: DateTime<Utc>) {
        self.last_update = Some(now.to_rfc3339_opts(SecondsFormat::Millis, true));
    }

    pub fn set_collection(&mut self, key: &str, value: Value) {
        self.extra.insert(key.to_string(), value);
    }

    pub fn collection(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

// Entries that are not finite numbers (older runs wrote NaN as `null`) are
// dropped so the rest of the document still loads; those players get a
// fresh baseline on the next reconcile.
fn de_snapshot<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    let mut out = BTreeMap::new();
    for (uuid, value) in raw {
        match value.as_f64().filter(|n| n.is_finite()) {
            Some(n) => {
                out.insert(uuid, n);
            }
            None => warn!(%uuid, %value, "dropping unusable snapshot entry"),
        }
    }
    Ok(out)
}

/// File-backed store. Reads fall back to an empty document; writes replace
/// the file wholesale.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> StoreDocument {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no store yet; starting empty");
                return StoreDocument::default();
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "store unreadable; starting empty");
                return StoreDocument::default();
            }
        };
        match serde_json::from_str::<StoreDocument>(&raw) {
            Ok(doc) => doc,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "store corrupt; starting empty");
                StoreDocument::default()
            }
        }
    }

    pub fn save(&self, doc: &StoreDocument) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("create store dir {}", dir.display()))?;
        }
        let mut json = serde_json::to_string_pretty(doc).context("serialize store")?;
        json.push('\n');
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("swap store {}", self.path.display()))?;
        Ok(())
    }
}
