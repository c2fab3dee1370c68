//! Client configuration: a TOML file with command line overrides.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// WebSocket endpoint of the board server.
    pub server_url: String,
    /// Login name presented to the server.
    pub user: String,
    /// Shared secret for login tokens. Must match the server.
    pub secret_key: String,
    /// Session lifetime in seconds.
    pub session_ttl_secs: i64,
    /// Settings endpoint; when absent the layout goes to a local file.
    pub prefs_url: Option<String>,
    /// Report key the board layout is stored under.
    pub prefs_key: String,
    /// Log file path.
    pub log_file: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            server_url: "ws://127.0.0.1:8001/board".to_string(),
            user: "planner".to_string(),
            secret_key: "change-me".to_string(),
            session_ttl_secs: 3600,
            prefs_url: None,
            prefs_key: "planningboard".to_string(),
            log_file: None,
        }
    }
}

impl ClientConfig {
    /// Read a TOML config file. A missing file means defaults; every
    /// field is optional in the file.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(raw) => {
                toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }
}
