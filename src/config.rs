//! Process configuration, read once at startup from the environment.
//!
//! A `.env` file in the working directory is loaded first if present.
//!
//! | Variable        | Default      |
//! |-----------------|--------------|
//! | `HOST`          | `127.0.0.1`  |
//! | `PORT`          | `5000`       |
//! | `API_BASE_PATH` | `/api`       |
//! | `STORE_BACKEND` | `sled`       |
//! | `DATA_DIR`      | `./data`     |
//! | `SEED_DB`       | `false`      |

use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Which store implementation backs the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Sled,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            "sled" => Ok(StoreBackend::Sled),
            other => Err(ConfigError::Invalid {
                var: "STORE_BACKEND",
                message: format!("unknown backend '{}' (expected 'memory' or 'sled')", other),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Invalid { var: &'static str, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid { var, message } => write!(f, "invalid {}: {}", var, message),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub api_base_path: String,
    pub store_backend: StoreBackend,
    pub data_dir: PathBuf,
    pub seed_db: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            api_base_path: "/api".to_string(),
            store_backend: StoreBackend::Sled,
            data_dir: PathBuf::from("./data"),
            seed_db: false,
        }
    }
}

impl AppConfig {
    /// Load `.env` (if any), then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source. Unset variables take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                var: "PORT",
                message: format!("'{}': {}", raw, e),
            })?,
            None => defaults.port,
        };

        let store_backend = match lookup("STORE_BACKEND") {
            Some(raw) => raw.parse()?,
            None => defaults.store_backend,
        };

        let seed_db = match lookup("SEED_DB") {
            Some(raw) => raw.trim().parse::<bool>().map_err(|e| ConfigError::Invalid {
                var: "SEED_DB",
                message: format!("'{}': {}", raw, e),
            })?,
            None => defaults.seed_db,
        };

        let config = Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            api_base_path: lookup("API_BASE_PATH").unwrap_or(defaults.api_base_path),
            store_backend,
            data_dir: lookup("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            seed_db,
        };

        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
