//! Shared configuration for CoBox front ends.
//!
//! TOML file + `COBOX_` environment loading, translation to
//! `cobox_core::DashboardConfig`, and the session storage backends
//! (plain file or OS keyring) selected by configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use cobox_core::session::SESSION_STORAGE_KEY;
use cobox_core::{
    CoreError, DEFAULT_API_BASE_URL, DashboardConfig, FileSessionStore, SessionStore,
};

/// Service name under which the keyring backend stores the session.
pub const KEYRING_SERVICE: &str = "cobox";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config ─────────────────────────────────────────────────────

/// Where the session record lives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    /// JSON file in the platform data directory.
    #[default]
    File,
    /// OS credential store.
    Keyring,
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Backend origin (`COBOX_API_BASE_URL`).
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub session_backend: SessionBackend,

    /// Override for the session file location (file backend only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_file: Option<PathBuf>,

    /// Default output format for the CLI.
    #[serde(default = "default_output")]
    pub output: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            timeout: default_timeout(),
            session_backend: SessionBackend::default(),
            session_file: None,
            output: default_output(),
        }
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.into()
}
fn default_timeout() -> u64 {
    30
}
fn default_output() -> String {
    "table".into()
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("app", "cobox", "cobox")
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("cobox");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Where the file backend keeps the session record.
pub fn session_path(cfg: &Config) -> PathBuf {
    if let Some(ref path) = cfg.session_file {
        return path.clone();
    }
    let dir = project_dirs().map_or_else(dirs_fallback, |dirs| dirs.data_dir().to_path_buf());
    dir.join(format!("{SESSION_STORAGE_KEY}.json"))
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` (a missing file is fine) layered under `COBOX_*`
/// environment variables.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("COBOX_"))
        .extract()?;
    Ok(config)
}

/// Serialize config to TOML and write to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(cfg)?)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Validate and build the runtime configuration.
pub fn to_dashboard_config(cfg: &Config) -> Result<DashboardConfig, ConfigError> {
    let url: url::Url = cfg
        .api_base_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "api_base_url".into(),
            reason: format!("invalid URL: {}", cfg.api_base_url),
        })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "api_base_url".into(),
            reason: format!("expected an http(s) URL, got scheme '{}'", url.scheme()),
        });
    }
    if cfg.timeout == 0 {
        return Err(ConfigError::Validation {
            field: "timeout".into(),
            reason: "must be at least 1 second".into(),
        });
    }

    Ok(DashboardConfig {
        api_base_url: url.into(),
        timeout: Duration::from_secs(cfg.timeout),
    })
}

/// The session store selected by `cfg`.
pub fn session_store(cfg: &Config) -> Arc<dyn SessionStore> {
    match cfg.session_backend {
        SessionBackend::File => Arc::new(FileSessionStore::at(session_path(cfg))),
        SessionBackend::Keyring => Arc::new(KeyringSessionStore::new()),
    }
}

// ── Keyring backend ─────────────────────────────────────────────────

/// Session record kept in the OS credential store as
/// service `cobox`, account `auth`.
#[derive(Debug, Clone)]
pub struct KeyringSessionStore {
    service: String,
    account: String,
}

impl Default for KeyringSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyringSessionStore {
    pub fn new() -> Self {
        Self {
            service: KEYRING_SERVICE.into(),
            account: SESSION_STORAGE_KEY.into(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, CoreError> {
        keyring::Entry::new(&self.service, &self.account).map_err(keyring_error)
    }
}

fn keyring_error(err: keyring::Error) -> CoreError {
    CoreError::Persistence {
        message: format!("keyring: {err}"),
    }
}

impl SessionStore for KeyringSessionStore {
    fn load(&self) -> Result<Option<String>, CoreError> {
        match self.entry()?.get_password() {
            Ok(record) => Ok(Some(record)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(keyring_error(e)),
        }
    }

    fn save(&self, record: &str) -> Result<(), CoreError> {
        self.entry()?.set_password(record).map_err(keyring_error)
    }

    fn clear(&self) -> Result<(), CoreError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(keyring_error(e)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_without_file() {
        Jail::expect_with(|jail| {
            let cfg = load_config_from(&jail.directory().join("missing.toml")).unwrap();
            assert_eq!(cfg, Config::default());
            assert_eq!(cfg.api_base_url, "http://localhost:8000");
            Ok(())
        });
    }

    #[test]
    fn file_then_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "cobox.toml",
                r#"
                    api_base_url = "https://fleet.example.com"
                    timeout = 5
                    session_backend = "keyring"
                "#,
            )?;
            let cfg = load_config_from(Path::new("cobox.toml")).unwrap();
            assert_eq!(cfg.api_base_url, "https://fleet.example.com");
            assert_eq!(cfg.timeout, 5);
            assert_eq!(cfg.session_backend, SessionBackend::Keyring);

            jail.set_env("COBOX_API_BASE_URL", "http://10.0.0.2:8080");
            let cfg = load_config_from(Path::new("cobox.toml")).unwrap();
            assert_eq!(cfg.api_base_url, "http://10.0.0.2:8080");
            assert_eq!(cfg.timeout, 5);
            Ok(())
        });
    }

    #[test]
    fn dashboard_config_validates_fields() {
        let cfg = Config {
            api_base_url: "ftp://example.com".into(),
            ..Config::default()
        };
        let err = to_dashboard_config(&cfg).unwrap_err();
        assert!(err.to_string().starts_with("invalid api_base_url"));

        let cfg = Config {
            timeout: 0,
            ..Config::default()
        };
        assert!(to_dashboard_config(&cfg).unwrap_err().to_string().contains("timeout"));

        let ok = to_dashboard_config(&Config::default()).unwrap();
        assert_eq!(ok.timeout, Duration::from_secs(30));
        assert_eq!(ok.api_base_url, "http://localhost:8000/");
    }

    #[test]
    fn session_file_override_is_honoured() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config {
            session_file: Some(dir.path().join("s.json")),
            ..Config::default()
        };
        assert_eq!(session_path(&cfg), dir.path().join("s.json"));

        let store = session_store(&cfg);
        store.save("{}").unwrap();
        assert!(dir.path().join("s.json").exists());
        store.clear().unwrap();
    }

    #[test]
    fn save_then_load() {
        Jail::expect_with(|jail| {
            let path = jail.directory().join("nested/config.toml");
            let cfg = Config {
                output: "json".into(),
                ..Config::default()
            };
            save_config_to(&cfg, &path).unwrap();
            assert_eq!(load_config_from(&path).unwrap(), cfg);
            Ok(())
        });
    }
}
