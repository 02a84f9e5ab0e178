/// Service configuration, loaded from a JSON file
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from reading configuration or catalog files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid catalog {}: {reason}", .path.display())]
    InvalidCatalog { path: PathBuf, reason: String },
}

/// Top-level configuration. Every field has a default, so an empty JSON
/// object is a valid config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bind_address: String,
    /// Maximum total credits a student may hold
    pub max_credits: u32,
    /// SQLite file for enrollments. Enrollments stay in memory when unset.
    pub database_path: Option<PathBuf>,
    /// JSON course catalog. The built-in catalog is used when unset.
    pub catalog_path: Option<PathBuf>,
    /// How long clients should keep success/error notices on screen
    pub notice_dismiss_ms: u64,
    pub gateway: GatewayConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
            max_credits: 18,
            database_path: None,
            catalog_path: None,
            notice_dismiss_ms: 5000,
            gateway: GatewayConfig::default(),
        }
    }
}

/// Latency and failure injection for the simulated registrar.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub register_delay_ms: u64,
    /// Probability in `[0, 1]` that a registration attempt fails
    pub register_failure_rate: f64,
    pub drop_delay_ms: u64,
    pub drop_failure_rate: f64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            register_delay_ms: 1000,
            register_failure_rate: 0.1,
            drop_delay_ms: 800,
            drop_failure_rate: 0.05,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
