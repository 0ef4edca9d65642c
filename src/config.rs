//! Configuration file handling.
//!
//! The configuration file is stored at `$EXPENSES_HOME/config.json` and
//! holds the settings for the remote expense service, most importantly its
//! base URL. Passing the configuration into the client explicitly (instead
//! of module-level state) is what makes the in-memory test client possible.

use crate::{utils, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

const APP_NAME: &str = "expenses";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";

/// Per-call network timeout, in milliseconds. Not configurable per call.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// The `Config` object represents the configuration of the app. You
/// instantiate it by providing the path to `$EXPENSES_HOME` and from there
/// it loads `$EXPENSES_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the data directory and an initial `config.json` pointing at
    /// `base_url`.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created, the URL does not
    /// parse, or a configuration file already exists there.
    pub async fn create(
        dir: impl Into<PathBuf>,
        base_url: &str,
        timeout_ms: u64,
    ) -> Result<Self> {
        let _ = Url::parse(base_url)
            .map_err(|err| Error::Config(format!("invalid base url '{base_url}': {err}")))?;

        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative).await?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.is_file() {
            return Err(Error::Config(format!(
                "a configuration file already exists at '{}'",
                config_path.display()
            )));
        }

        let config_file = ConfigFile {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            base_url: base_url.to_string(),
            timeout_ms,
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    /// Validates that the home directory and config file exist, then loads
    /// the configuration.
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = home.into();
        let root = utils::canonicalize(&maybe_relative).await.map_err(|_| {
            Error::Config(format!(
                "the expenses home directory '{}' is missing; run `expenses init` first",
                maybe_relative.display()
            ))
        })?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            return Err(Error::Config(format!(
                "the config file is missing at '{}'; run `expenses init` first",
                config_path.display()
            )));
        }
        let config_file: ConfigFile = utils::deserialize(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn base_url(&self) -> &str {
        &self.config_file.base_url
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.config_file.timeout_ms)
    }
}

/// Represents the serialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "expenses",
///   "config_version": 1,
///   "base_url": "http://localhost:4000",
///   "timeout_ms": 10000
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "expenses".
    app_name: String,

    /// Configuration file version.
    config_version: u8,

    /// The base address of the remote expense service.
    base_url: String,

    /// Per-call network timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl ConfigFile {
    async fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        utils::write(path, json).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn create_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("expenses");
        let created = Config::create(&home, "http://localhost:4000", 5_000)
            .await
            .unwrap();
        assert_eq!(created.base_url(), "http://localhost:4000");

        let loaded = Config::load(&home).await.unwrap();
        assert_eq!(loaded.base_url(), "http://localhost:4000");
        assert_eq!(loaded.timeout(), Duration::from_millis(5_000));
        assert!(loaded.config_path().is_file());
    }

    #[tokio::test]
    async fn create_rejects_bad_urls_and_double_init() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("expenses");
        assert!(Config::create(&home, "not a url", 5_000).await.is_err());

        Config::create(&home, "http://localhost:4000", 5_000)
            .await
            .unwrap();
        let err = Config::create(&home, "http://localhost:4000", 5_000)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn load_without_init_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(Config::load(&missing).await.is_err());
    }

    #[tokio::test]
    async fn missing_timeout_defaults_to_ten_seconds() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("expenses");
        tokio::fs::create_dir_all(&home).await.unwrap();
        tokio::fs::write(
            home.join("config.json"),
            r#"{"app_name":"expenses","config_version":1,"base_url":"http://localhost:4000"}"#,
        )
        .await
        .unwrap();
        let config = Config::load(&home).await.unwrap();
        assert_eq!(config.timeout(), Duration::from_millis(DEFAULT_TIMEOUT_MS));
    }
}
