use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "UPSTAC";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default HTTP port for the API server
pub const DEFAULT_PORT: u16 = 8080;

/// Environment overrides
pub const ENV_BIND_ADDR: &str = "UPSTAC_BIND_ADDR";
pub const ENV_DB_PATH: &str = "UPSTAC_DB_PATH";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {var}: {value} ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("Cannot determine home directory")]
    NoHomeDir,
}

/// Log filter used when `RUST_LOG` is not set
pub fn default_log_filter() -> &'static str {
    "upstac=info,upstac_lib=info,tower_http=warn"
}

/// Get the application data directory (~/.upstac/)
pub fn app_data_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(".upstac"))
}

/// Default location of the SQLite database
pub fn default_db_path() -> Result<PathBuf, ConfigError> {
    Ok(app_data_dir()?.join("upstac.db"))
}

/// Runtime settings for the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub db_path: PathBuf,
}

impl ServerConfig {
    /// Read settings from the process environment, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = match lookup(ENV_BIND_ADDR) {
            Some(raw) => raw.parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::InvalidValue {
                    var: ENV_BIND_ADDR,
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?,
            None => SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
        };

        let db_path = match lookup(ENV_DB_PATH) {
            Some(raw) if !raw.trim().is_empty() => PathBuf::from(raw),
            Some(raw) => {
                return Err(ConfigError::InvalidValue {
                    var: ENV_DB_PATH,
                    value: raw,
                    reason: "empty path".into(),
                })
            }
            None => default_db_path()?,
        };

        Ok(Self { bind_addr, db_path })
    }
}
