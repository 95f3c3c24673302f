//! Application configuration. A small YAML file in the per-user data
//! directory supplies the navigation fragment URL and the database location;
//! when the file is absent or unreadable the defaults below apply so the
//! application always starts.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".inward-register";
/// Configuration file name stored inside the application data directory.
const CONFIG_FILE_NAME: &str = "config.yaml";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "inward.sqlite";

fn default_navbar_url() -> String {
    "http://localhost:8000/navbar.html".to_string()
}

fn default_route() -> String {
    "/inward.html".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where the shared navigation fragment is served from.
    #[serde(default = "default_navbar_url")]
    pub navbar_url: String,
    /// Location of the SQLite database file.
    #[serde(default)]
    pub database: Option<PathBuf>,
    /// Route of this page, used to highlight the matching navigation entry.
    #[serde(default = "default_route")]
    pub route: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            navbar_url: default_navbar_url(),
            database: None,
            route: default_route(),
        }
    }
}

impl Config {
    /// Per-user directory holding the config file, the database, and the log.
    pub fn data_dir() -> Result<PathBuf> {
        let base = BaseDirs::new().ok_or_else(|| anyhow!("could not determine home directory"))?;
        Ok(base.home_dir().join(DATA_DIR_NAME))
    }

    /// Full path of the configuration file.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Full path of the SQLite database, honoring a configured override.
    pub fn database_file(&self) -> Result<PathBuf> {
        match &self.database {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::data_dir()?.join(DB_FILE_NAME)),
        }
    }

    /// Load the configuration from `path` (or the default location). A
    /// missing file yields the defaults; an unreadable or malformed file is
    /// logged and also yields the defaults, so startup never fails here.
    pub fn load(path: Option<&Path>) -> Self {
        let path = match path {
            Some(explicit) => explicit.to_path_buf(),
            None => match Self::config_file() {
                Ok(default_path) => default_path,
                Err(err) => {
                    warn!("no usable config location, falling back to defaults: {err}");
                    return Self::default();
                }
            },
        };

        if !path.exists() {
            return Self::default();
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                warn!("could not read {}, falling back to defaults: {err}", path.display());
                return Self::default();
            }
        };

        match serde_yaml::from_str(&content) {
            Ok(config) => config,
            Err(err) => {
                warn!("could not parse {}, falling back to defaults: {err}", path.display());
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("nope.yaml")));
        assert_eq!(config.navbar_url, default_navbar_url());
        assert_eq!(config.route, "/inward.html");
        assert!(config.database.is_none());
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, ":: not yaml ::{").unwrap();
        let config = Config::load(Some(&path));
        assert_eq!(config.navbar_url, default_navbar_url());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "navbar_url: http://nav.example/fragment.html\n").unwrap();
        let config = Config::load(Some(&path));
        assert_eq!(config.navbar_url, "http://nav.example/fragment.html");
        assert_eq!(config.route, "/inward.html");
    }
}
