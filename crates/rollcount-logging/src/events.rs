use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Structured events emitted by the counter and override stores
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StoreEvent {
    /// The counter snapshot was rebuilt from defaults and written out.
    SnapshotReset {
        path: PathBuf,
        reason: String,
    },
    /// Windows missing from the document were seeded from the current date.
    SnapshotRepaired {
        path: PathBuf,
        windows: Vec<String>,
    },
    SnapshotRolledOver {
        path: PathBuf,
        granularity: String,
    },
    /// The on-disk text differed from the canonical form and was rewritten.
    SnapshotReformatted {
        path: PathBuf,
    },
    SnapshotSaved {
        path: PathBuf,
        rolled_over: bool,
    },
    SnapshotWriteFailed {
        path: PathBuf,
        error: String,
    },
    /// The in-memory snapshot was cleared; the file is untouched.
    SnapshotUnloaded {
        path: PathBuf,
    },
    OverridesLoaded {
        path: PathBuf,
        entries: usize,
    },
    OverridesLoadFailed {
        path: PathBuf,
        error: String,
    },
    OverridesSaved {
        path: PathBuf,
        entries: usize,
    },
    OverridesWriteFailed {
        path: PathBuf,
        error: String,
    },
}

impl StoreEvent {
    /// Short machine-friendly name, matches the serde tag.
    pub fn name(&self) -> &'static str {
        match self {
            StoreEvent::SnapshotReset { .. } => "snapshot_reset",
            StoreEvent::SnapshotRepaired { .. } => "snapshot_repaired",
            StoreEvent::SnapshotRolledOver { .. } => "snapshot_rolled_over",
            StoreEvent::SnapshotReformatted { .. } => "snapshot_reformatted",
            StoreEvent::SnapshotSaved { .. } => "snapshot_saved",
            StoreEvent::SnapshotWriteFailed { .. } => "snapshot_write_failed",
            StoreEvent::SnapshotUnloaded { .. } => "snapshot_unloaded",
            StoreEvent::OverridesLoaded { .. } => "overrides_loaded",
            StoreEvent::OverridesLoadFailed { .. } => "overrides_load_failed",
            StoreEvent::OverridesSaved { .. } => "overrides_saved",
            StoreEvent::OverridesWriteFailed { .. } => "overrides_write_failed",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            StoreEvent::SnapshotWriteFailed { .. }
                | StoreEvent::OverridesLoadFailed { .. }
                | StoreEvent::OverridesWriteFailed { .. }
        )
    }

    /// JSON rendering with an added RFC 3339 timestamp
    pub fn to_json(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(obj) = value.as_object_mut() {
            obj.insert(
                "timestamp".to_string(),
                serde_json::Value::String(chrono::Utc::now().to_rfc3339()),
            );
        }
        value
    }

    /// One-line summary used as the tracing message.
    pub fn compact(&self) -> String {
        match self {
            StoreEvent::SnapshotReset { path, reason } => {
                format!("snapshot:reset {} ({})", path.display(), reason)
            }
            StoreEvent::SnapshotRepaired { path, windows } => {
                format!("snapshot:repair {} [{}]", path.display(), windows.join(","))
            }
            StoreEvent::SnapshotRolledOver { path, granularity } => {
                format!("snapshot:rollover {} {}", path.display(), granularity)
            }
            StoreEvent::SnapshotReformatted { path } => {
                format!("snapshot:reformat {}", path.display())
            }
            StoreEvent::SnapshotSaved { path, rolled_over } => {
                let verb = if *rolled_over { "reset+save" } else { "save" };
                format!("snapshot:{} {}", verb, path.display())
            }
            StoreEvent::SnapshotWriteFailed { path, error } => {
                format!("snapshot:write-failed {} {}", path.display(), error)
            }
            StoreEvent::SnapshotUnloaded { path } => {
                format!("snapshot:unload {}", path.display())
            }
            StoreEvent::OverridesLoaded { path, entries } => {
                format!("overrides:load {} {} entries", path.display(), entries)
            }
            StoreEvent::OverridesLoadFailed { path, error } => {
                format!("overrides:load-failed {} {}", path.display(), error)
            }
            StoreEvent::OverridesSaved { path, entries } => {
                format!("overrides:save {} {} entries", path.display(), entries)
            }
            StoreEvent::OverridesWriteFailed { path, error } => {
                format!("overrides:write-failed {} {}", path.display(), error)
            }
        }
    }

    /// Send the event to the installed tracing subscriber.
    pub fn emit(&self) {
        let event = self.name();
        if self.is_failure() {
            tracing::warn!(event, "{}", self.compact());
            return;
        }
        match self {
            StoreEvent::SnapshotSaved {
                rolled_over: false,
                ..
            }
            | StoreEvent::SnapshotUnloaded { .. }
            | StoreEvent::OverridesSaved { .. } => {
                tracing::debug!(event, "{}", self.compact());
            }
            _ => tracing::info!(event, "{}", self.compact()),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable multi-field output
    #[default]
    Pretty,
    /// JSON lines format for machine consumption
    Json,
    /// Compact single-line format
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}
