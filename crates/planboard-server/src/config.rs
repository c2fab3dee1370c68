//! Configuration for the board server.
//!
//! For now this is intentionally simple: defaults plus a few
//! environment variables:
//!
//! - `PLANBOARD_BIND_ADDR`   (default: "0.0.0.0")
//! - `PLANBOARD_PORT`        (default: "8001")
//! - `PLANBOARD_MAX_CLIENTS` (default: "20")
//! - `PLANBOARD_SECRET_KEY`  (required; clients derive login tokens from it)
//! - `PLANBOARD_MODEL`       (optional path to a JSON model file)

use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// IP address / interface to bind to (e.g. "0.0.0.0" or "127.0.0.1").
    pub bind_addr: String,

    /// TCP port to listen on.
    pub port: u16,

    /// Maximum number of simultaneously connected clients.
    pub max_clients: usize,

    /// Shared secret for login-token verification.
    pub secret_key: String,

    /// JSON model file to serve; the built-in demo model when absent.
    pub model_path: Option<String>,
}

impl Config {
    /// Construct a `Config` from environment variables, falling back
    /// to defaults for everything except the secret.
    pub fn from_env() -> Result<Self> {
        let bind_addr = env::var("PLANBOARD_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = read_env_or_default("PLANBOARD_PORT", 8001u16)?;
        let max_clients = read_env_or_default("PLANBOARD_MAX_CLIENTS", 20usize)?;
        let secret_key =
            env::var("PLANBOARD_SECRET_KEY").context("PLANBOARD_SECRET_KEY must be set")?;
        let model_path = env::var("PLANBOARD_MODEL").ok();

        Ok(Config {
            bind_addr,
            port,
            max_clients,
            secret_key,
            model_path,
        })
    }

    /// Convenience: `addr:port` socket string.
    pub fn socket_addr_string(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn read_env_or_default<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .with_context(|| format!("bad value for {key}")),
        Err(_) => Ok(default),
    }
}
