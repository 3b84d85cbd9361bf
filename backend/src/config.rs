//! Server configuration.
//!
//! Defaults are overridden by environment variables (a `.env` file is loaded
//! by the binary through `dotenvy`), which are in turn overridden by CLI flags.
//!
//! | Variable                       | Default   |
//! |--------------------------------|-----------|
//! | `MATRIX_HOST`                  | `0.0.0.0` |
//! | `MATRIX_PORT`                  | `8080`    |
//! | `MATRIX_DATA_DIR`              | `.`       |
//! | `MATRIX_MAX_FILE_BYTES`        | `1024`    |
//! | `MATRIX_REQUEST_TIMEOUT_SECS`  | `30`      |
//! | `MATRIX_SHUTDOWN_TIMEOUT_SECS` | `30`      |

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::parser::{FileContentProvider, DEFAULT_MAX_FILE_BYTES};

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Directory that request paths (`testdata/...`) are resolved against
    pub data_dir: PathBuf,
    /// Size ceiling for matrix files
    pub max_file_bytes: u64,
    /// Per-request deadline in seconds
    pub request_timeout_secs: u64,
    /// How long in-flight requests get to finish after a shutdown signal
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            data_dir: PathBuf::from("."),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            request_timeout_secs: 30,
            shutdown_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by process environment variables.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("MATRIX_HOST") {
            config.host = host;
        }
        if let Some(dir) = lookup("MATRIX_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(port) = parse_var(&lookup, "MATRIX_PORT")? {
            config.port = port;
        }
        if let Some(bytes) = parse_var(&lookup, "MATRIX_MAX_FILE_BYTES")? {
            config.max_file_bytes = bytes;
        }
        if let Some(secs) = parse_var(&lookup, "MATRIX_REQUEST_TIMEOUT_SECS")? {
            config.request_timeout_secs = secs;
        }
        if let Some(secs) = parse_var(&lookup, "MATRIX_SHUTDOWN_TIMEOUT_SECS")? {
            config.shutdown_timeout_secs = secs;
        }

        Ok(config)
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Base URL shown in the operations banner.
    pub fn public_url(&self) -> String {
        let host = match self.host.as_str() {
            "0.0.0.0" | "::" => "localhost",
            other => other,
        };
        format!("http://{}:{}", host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    /// File provider rooted at `data_dir` with this config's size ceiling.
    pub fn content_provider(&self) -> FileContentProvider {
        FileContentProvider::new(&self.data_dir).with_max_file_bytes(self.max_file_bytes)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> ConfigResult<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                value,
                message: e.to_string(),
            }),
    }
}
