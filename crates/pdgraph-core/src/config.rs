//! Process-wide configuration store.
//!
//! The store is created once at process start and shared as `Arc<ConfigStore>`
//! with everything that needs the credential. Updates are merged field by
//! field, persisted to a TOML file when one is attached, and announced on a
//! broadcast channel as [`StatusChanged`] signals.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::error::PdgResult;

/// Shown by the status check while no API key is stored.
pub const NOT_CONFIGURED_MESSAGE: &str = "Please [get an PagerDuty API key](https://support.pagerduty.com/docs/generating-api-keys) and [configure](:configure) it.";

const READY_MESSAGE: &str = "Ready";

/// Persisted credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing_key: Option<String>,
}

/// Partial update accepted by the configure operation.
///
/// A field left as `None` keeps the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigUpdate {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub routing_key: Option<String>,
}

impl Config {
    /// Apply an update, keeping prior values for omitted fields.
    pub fn merge(&mut self, update: ConfigUpdate) {
        if let Some(api_key) = update.api_key {
            self.api_key = Some(api_key);
        }
        if let Some(routing_key) = update.routing_key {
            self.routing_key = Some(routing_key);
        }
    }
}

/// Readiness of the integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    NotConfigured,
    Ready,
}

impl Status {
    /// User-facing message for this status.
    pub fn message(&self) -> &'static str {
        match self {
            Self::NotConfigured => NOT_CONFIGURED_MESSAGE,
            Self::Ready => READY_MESSAGE,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Emitted after every configuration update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChanged {
    pub status: Status,
}

/// Shared configuration record with optional file persistence.
pub struct ConfigStore {
    path: Option<PathBuf>,
    current: RwLock<Config>,
    tx: broadcast::Sender<StatusChanged>,
}

impl ConfigStore {
    /// Create a store that is never written to disk.
    pub fn in_memory() -> Self {
        Self::with_config(Config::default())
    }

    /// Create an in-memory store seeded with `config`.
    pub fn with_config(config: Config) -> Self {
        let (tx, _rx) = broadcast::channel(16);
        Self {
            path: None,
            current: RwLock::new(config),
            tx,
        }
    }

    /// Load the store from a TOML file. A missing file yields an empty config.
    pub fn load(path: impl Into<PathBuf>) -> PdgResult<Self> {
        let path = path.into();
        let config = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            toml::from_str(&raw)?
        } else {
            debug!(path = %path.display(), "No configuration file yet, starting empty");
            Config::default()
        };

        let mut store = Self::with_config(config);
        store.path = Some(path);
        Ok(store)
    }

    /// Default location of the configuration file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pdgraph").join("config.toml"))
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Copy of the current record.
    pub fn snapshot(&self) -> Config {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// The stored API key. An empty key counts as no key.
    pub fn api_key(&self) -> Option<String> {
        self.snapshot().api_key.filter(|key| !key.is_empty())
    }

    pub fn routing_key(&self) -> Option<String> {
        self.snapshot().routing_key.filter(|key| !key.is_empty())
    }

    /// Current readiness. A missing key is a state, not an error.
    pub fn status(&self) -> Status {
        match self.api_key() {
            Some(_) => Status::Ready,
            None => Status::NotConfigured,
        }
    }

    /// Merge an update, persist it and announce the new status.
    pub fn configure(&self, update: ConfigUpdate) -> PdgResult<Config> {
        let mut merged = self.snapshot();
        merged.merge(update);

        if let Some(path) = &self.path {
            save(path, &merged)?;
        }

        *self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = merged.clone();

        let status = self.status();
        info!(status = ?status, "Configuration updated");
        // No subscribers is fine; the signal is best effort.
        let _ = self.tx.send(StatusChanged { status });

        Ok(merged)
    }

    /// Listen for status-changed signals.
    pub fn subscribe(&self) -> broadcast::Receiver<StatusChanged> {
        self.tx.subscribe()
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

fn save(path: &Path, config: &Config) -> PdgResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let raw = toml::to_string_pretty(config)?;
    std::fs::write(path, raw)?;
    debug!(path = %path.display(), "Configuration saved");
    Ok(())
}
