// Configuration loading and parsing (holdem.toml).

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

/// Config file looked up in the working directory when none is given.
pub const CONFIG_FILE_NAME: &str = "holdem.toml";

/// Store file name used when the config does not name one.
pub const DB_FILE_NAME: &str = "game.db.json";

pub const DEFAULT_LOG_FILTER: &str = "holdem_core=info,holdem_server=info,holdem_cli=info,warn";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    /// `bind:port`, ready for a TCP listener.
    pub fn address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON file holding the league.
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directives. `RUST_LOG` takes precedence.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate the config file at `path`. Missing sections and keys
/// take their defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })?;
    let config: Config = toml::from_str(&text).map_err(|source| ConfigError::ParseError {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

/// Load `explicit` if given, else `holdem.toml` from the working directory if
/// present, else the built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = explicit {
        return load_config_from(path);
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return load_config_from(&local);
    }

    let config = Config::default();
    config.validate()?;
    Ok(config)
}

/// `game.db.json` in the platform data directory, or in the working directory
/// when no home directory can be resolved.
pub fn default_store_path() -> PathBuf {
    ProjectDirs::from("", "", "holdem")
        .map(|dirs| dirs.data_dir().join(DB_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(DB_FILE_NAME))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError {
                field: "server.port".into(),
                message: "must be greater than 0".into(),
            });
        }

        if self.server.bind.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: "server.bind".into(),
                message: "must not be empty".into(),
            });
        }

        if self.store.path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError {
                field: "store.path".into(),
                message: "must not be empty".into(),
            });
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Write `contents` to a fresh config file under a per-test temp dir.
    fn write_config(label: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("holdem_config_{label}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE_NAME);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn full_config_is_loaded() {
        let path = write_config(
            "full",
            r#"
[server]
bind = "0.0.0.0"
port = 5001

[store]
path = "/var/lib/holdem/league.json"

[logging]
filter = "debug"
"#,
        );

        let config = load_config_from(&path).expect("should load valid config");

        assert_eq!(config.server.address(), "0.0.0.0:5001");
        assert_eq!(config.store.path, PathBuf::from("/var/lib/holdem/league.json"));
        assert_eq!(config.logging.filter, "debug");
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn missing_sections_take_defaults() {
        let path = write_config("partial", "[server]\nport = 8080\n");

        let config = load_config_from(&path).unwrap();

        assert_eq!(config.server.bind, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.store, StoreConfig::default());
        assert_eq!(config.logging.filter, DEFAULT_LOG_FILTER);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn default_store_file_is_named_game_db_json() {
        assert!(default_store_path().ends_with(DB_FILE_NAME));
    }

    #[test]
    fn zero_port_is_rejected() {
        let path = write_config("zero_port", "[server]\nport = 0\n");

        let err = load_config_from(&path).unwrap_err();

        assert!(
            matches!(err, ConfigError::ValidationError { ref field, .. } if field == "server.port")
        );
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn empty_store_path_is_rejected() {
        let path = write_config("empty_store", "[store]\npath = \"\"\n");

        let err = load_config_from(&path).unwrap_err();

        assert!(
            matches!(err, ConfigError::ValidationError { ref field, .. } if field == "store.path")
        );
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let path = write_config("bad_toml", "[server\nport = ");

        let err = load_config_from(&path).unwrap_err();

        assert!(matches!(err, ConfigError::ParseError { .. }));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn explicit_missing_file_is_not_found() {
        let path = std::env::temp_dir().join("holdem_config_does_not_exist.toml");

        let err = load_config(Some(&path)).unwrap_err();

        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }
}
