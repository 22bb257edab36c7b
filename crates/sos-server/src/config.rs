//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use dispatch::{DispatchConfig, DispatchError};

/// SOS server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Plain-text dispatch audit file.
    pub audit_log: PathBuf,
    /// Channel credentials and message settings.
    pub dispatch: DispatchConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `SAFEWALK_ADDR` | Server bind address | `127.0.0.1:5000` |
    /// | `SQLITE_PATH` | SQLite path or URL | `sqlite:safewalk.db?mode=rwc` |
    /// | `SAFEWALK_AUDIT_LOG` | Dispatch audit file | `logs/sos_dispatch.log` |
    ///
    /// Channel variables are documented on [`DispatchConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr = lookup("SAFEWALK_ADDR")
            .unwrap_or_else(|| "127.0.0.1:5000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = lookup("SQLITE_PATH")
            .map(|path| sqlite_url_from_path(&path))
            .unwrap_or_else(|| "sqlite:safewalk.db?mode=rwc".to_string());

        let audit_log = lookup("SAFEWALK_AUDIT_LOG")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "logs/sos_dispatch.log".to_string())
            .into();

        let dispatch = DispatchConfig::from_lookup(&lookup)?;

        Ok(Self {
            addr,
            database_url,
            audit_log,
            dispatch,
        })
    }
}

fn sqlite_url_from_path(path: &str) -> String {
    if path.starts_with("sqlite:") {
        path.to_string()
    } else {
        format!("sqlite:{}?mode=rwc", path)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid SAFEWALK_ADDR format")]
    InvalidAddr,

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.addr.to_string(), "127.0.0.1:5000");
        assert_eq!(config.database_url, "sqlite:safewalk.db?mode=rwc");
        assert_eq!(config.audit_log, PathBuf::from("logs/sos_dispatch.log"));
        assert!(!config.dispatch.sms_configured());
        assert!(!config.dispatch.mail_configured());
    }

    #[test]
    fn test_plain_sqlite_path_becomes_url() {
        let config = Config::from_lookup(lookup(&[("SQLITE_PATH", "data/app.db")])).unwrap();
        assert_eq!(config.database_url, "sqlite:data/app.db?mode=rwc");
    }

    #[test]
    fn test_malformed_values_are_errors() {
        assert!(matches!(
            Config::from_lookup(lookup(&[("SAFEWALK_ADDR", "nowhere")])),
            Err(ConfigError::InvalidAddr)
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("SAFEWALK_COUNTRY_CODE", "91")])),
            Err(ConfigError::Dispatch(_))
        ));
    }
}
