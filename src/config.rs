use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("idle_timeout_secs must be greater than zero")]
    ZeroIdleTimeout,
    #[error("root directory {0} is not a directory")]
    NotADirectory(PathBuf),
}

/// Server settings. Set once at startup and read-only afterwards.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    /// Directory whose contents are served.
    pub root_dir: PathBuf,
    /// How long a connection may sit without a complete request head.
    pub idle_timeout_secs: u64,
    /// Upper bound on draining inbound bytes after a half-close.
    pub drain_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            root_dir: PathBuf::from("."),
            idle_timeout_secs: 30,
            drain_timeout_ms: 1000,
        }
    }
}

impl Config {
    /// Defaults overridden by the `LISTEN` and `ROOT_DIR` environment variables.
    pub fn load() -> Self {
        let mut cfg = Self::default();
        cfg.apply_env();
        cfg
    }

    /// Parses YAML. Missing keys keep their defaults.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn apply_env(&mut self) {
        if let Ok(listen) = std::env::var("LISTEN") {
            self.listen_addr = listen;
        }
        if let Ok(root) = std::env::var("ROOT_DIR") {
            self.root_dir = PathBuf::from(root);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.idle_timeout_secs == 0 {
            return Err(ConfigError::ZeroIdleTimeout);
        }
        if !self.root_dir.is_dir() {
            return Err(ConfigError::NotADirectory(self.root_dir.clone()));
        }
        Ok(())
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn drain_timeout(&self) -> Duration {
        Duration::from_millis(self.drain_timeout_ms)
    }
}
