//! Preference store: where the board layout lives between runs.
//!
//! The layout is a JSON object `{"rows": ["<kind>/<name>", ...]}`
//! stored under a report key. Deployments with a settings endpoint use
//! the HTTP store; everyone else gets a JSON file in the platform
//! config directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::warn;

use planboard_core::EntityKey;

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("preference request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("preference endpoint answered {0}")]
    Status(reqwest::StatusCode),
    #[error("preference io: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored preferences are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Somewhere to keep per-user settings, keyed by report name.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn save(&self, key: &str, value: &Value) -> Result<(), PrefsError>;
    async fn load(&self, key: &str) -> Result<Option<Value>, PrefsError>;
}

/// Settings endpoint over HTTP.
///
/// Saving posts `{key: value}`; loading fetches the settings object
/// and picks our key out of it.
pub struct HttpPreferenceStore {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpPreferenceStore {
    pub fn new(endpoint: impl Into<String>) -> Self {
        HttpPreferenceStore {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl PreferenceStore for HttpPreferenceStore {
    async fn save(&self, key: &str, value: &Value) -> Result<(), PrefsError> {
        let body = json!({ key: value });
        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(PrefsError::Status(response.status()));
        }
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<Value>, PrefsError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("report", key)])
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(PrefsError::Status(response.status()));
        }
        let settings: Value = response.json().await?;
        Ok(settings.get(key).cloned())
    }
}

/// Settings kept in one JSON file, an object keyed by report name.
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        FilePreferenceStore { path: path.into() }
    }

    /// The default location under the platform config directory.
    pub fn in_config_dir() -> Option<Self> {
        let dirs = directories::ProjectDirs::from("", "", "planboard")?;
        Some(Self::at(dirs.config_dir().join("settings.json")))
    }

    fn read_all(&self) -> Result<Value, PrefsError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Value::Object(Default::default()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl PreferenceStore for FilePreferenceStore {
    async fn save(&self, key: &str, value: &Value) -> Result<(), PrefsError> {
        let mut all = self.read_all()?;
        if !all.is_object() {
            all = Value::Object(Default::default());
        }
        if let Some(map) = all.as_object_mut() {
            map.insert(key.to_string(), value.clone());
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&all)?)?;
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<Value>, PrefsError> {
        Ok(self.read_all()?.get(key).cloned())
    }
}

/// In-memory store for tests and offline runs.
#[derive(Default)]
pub struct MemoryStore {
    values: tokio::sync::Mutex<serde_json::Map<String, Value>>,
}

#[async_trait]
impl PreferenceStore for MemoryStore {
    async fn save(&self, key: &str, value: &Value) -> Result<(), PrefsError> {
        self.values.lock().await.insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<Value>, PrefsError> {
        Ok(self.values.lock().await.get(key).cloned())
    }
}

// ---- Board layout payload ----

/// Wrap an ordered key list as the stored layout value.
pub fn rows_to_value(rows: &[EntityKey]) -> Value {
    let rows: Vec<String> = rows.iter().map(|key| key.to_string()).collect();
    json!({ "rows": rows })
}

/// Read the key list back out of a stored layout value.
///
/// Entries that no longer parse are skipped with a warning; one stale
/// row should not cost the user the rest of the board.
pub fn rows_from_value(value: &Value) -> Vec<EntityKey> {
    let Some(rows) = value.get("rows").and_then(Value::as_array) else {
        return Vec::new();
    };
    let mut keys = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(raw) = row.as_str() else {
            warn!(?row, "skipping non-string layout row");
            continue;
        };
        match raw.parse::<EntityKey>() {
            Ok(key) => keys.push(key),
            Err(e) => warn!(row = raw, error = %e, "skipping unreadable layout row"),
        }
    }
    keys
}
