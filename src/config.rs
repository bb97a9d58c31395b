//! Configuration handling for the admin

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Environment variable overriding where records are stored
pub const DATA_DIR_ENV: &str = "FOLIO_ADMIN_DATA_DIR";

const STORE_FILE: &str = "records.json";

/// User configuration for the admin
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AdminConfig {
    /// Directory holding the record store
    pub data_dir: Option<PathBuf>,
    /// Locale preselected on new CV sections
    pub default_locale: Option<String>,
}

impl AdminConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("io", "folio", "folio-admin")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::config_path() {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                return Self::parse(&content);
            }
        }
        Ok(Self::default())
    }

    fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Where the record store lives: environment, then config, then the
    /// platform data directory, then the working directory
    pub fn store_path(&self) -> PathBuf {
        self.store_path_with(std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
    }

    fn store_path_with(&self, env_dir: Option<PathBuf>) -> PathBuf {
        let dir = env_dir
            .or_else(|| self.data_dir.clone())
            .or_else(|| Self::project_dirs().map(|dirs| dirs.data_dir().to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."));
        dir.join(STORE_FILE)
    }

    pub fn locale(&self) -> &str {
        self.default_locale.as_deref().unwrap_or("en")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = AdminConfig::default();
        assert!(config.data_dir.is_none());
        assert_eq!(config.locale(), "en");
    }

    #[test]
    fn test_partial_file() {
        let config = AdminConfig::parse(r#"{ "default_locale": "pt" }"#).unwrap();
        assert_eq!(config.locale(), "pt");
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_serialization() {
        let config = AdminConfig {
            data_dir: Some(PathBuf::from("/srv/folio")),
            default_locale: Some("es".to_string()),
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed = AdminConfig::parse(&json).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_store_path_precedence() {
        let config = AdminConfig {
            data_dir: Some(PathBuf::from("/srv/folio")),
            ..Default::default()
        };

        assert_eq!(
            config.store_path_with(Some(PathBuf::from("/tmp/override"))),
            PathBuf::from("/tmp/override/records.json")
        );
        assert_eq!(
            config.store_path_with(None),
            PathBuf::from("/srv/folio/records.json")
        );
    }
}
