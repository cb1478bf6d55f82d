//! Configuration management
//!
//! This module handles loading and parsing configuration for the coursecat
//! service. Configuration can be loaded from:
//! - config.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Upload directory configuration
    #[serde(default)]
    pub upload: UploadConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origin
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

/// Database driver selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseDriver {
    /// SQLite (default, single-binary deployment)
    Sqlite,
    /// MySQL (larger deployments)
    Mysql,
}

impl Default for DatabaseDriver {
    fn default() -> Self {
        Self::Sqlite
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database driver to use
    #[serde(default)]
    pub driver: DatabaseDriver,
    /// Connection URL or file path
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: DatabaseDriver::default(),
            url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "data/coursecat.db".to_string()
}

/// Upload directory configuration
///
/// File and image items store paths relative to these directories.
/// The storage backend itself is external to this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Directory for file items
    #[serde(default = "default_files_dir")]
    pub files_dir: String,
    /// Directory for image items
    #[serde(default = "default_images_dir")]
    pub images_dir: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            files_dir: default_files_dir(),
            images_dir: default_images_dir(),
        }
    }
}

fn default_files_dir() -> String {
    "files".to_string()
}

fn default_images_dir() -> String {
    "images".to_string()
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },

    /// Failed to parse the configuration file
    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: String, message: String },
}

impl Config {
    /// Load configuration from a YAML file.
    ///
    /// Returns defaults if the file does not exist or is empty.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides.
    ///
    /// Environment variables follow the pattern:
    /// - COURSECAT_SERVER_HOST
    /// - COURSECAT_SERVER_PORT
    /// - COURSECAT_SERVER_CORS_ORIGIN
    /// - COURSECAT_DATABASE_DRIVER
    /// - COURSECAT_DATABASE_URL
    /// - COURSECAT_UPLOAD_FILES_DIR
    /// - COURSECAT_UPLOAD_IMAGES_DIR
    pub fn load_with_env(path: &Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("COURSECAT_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("COURSECAT_SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.server.port = port;
            }
        }
        if let Ok(cors_origin) = std::env::var("COURSECAT_SERVER_CORS_ORIGIN") {
            self.server.cors_origin = cors_origin;
        }

        if let Ok(driver) = std::env::var("COURSECAT_DATABASE_DRIVER") {
            match driver.to_lowercase().as_str() {
                "sqlite" => self.database.driver = DatabaseDriver::Sqlite,
                "mysql" => self.database.driver = DatabaseDriver::Mysql,
                _ => {} // Ignore invalid values
            }
        }
        if let Ok(url) = std::env::var("COURSECAT_DATABASE_URL") {
            self.database.url = url;
        }

        if let Ok(dir) = std::env::var("COURSECAT_UPLOAD_FILES_DIR") {
            self.upload.files_dir = dir;
        }
        if let Ok(dir) = std::env::var("COURSECAT_UPLOAD_IMAGES_DIR") {
            self.upload.images_dir = dir;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.driver, DatabaseDriver::Sqlite);
        assert_eq!(config.upload.files_dir, "files");
        assert_eq!(config.upload.images_dir, "images");
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let config = Config::load(Path::new("does/not/exist.yml")).expect("should not fail");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_load_from_yaml() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "server:\n  port: 9000\ndatabase:\n  driver: mysql\n  url: mysql://localhost/courses"
        )
        .expect("write config");

        let config = Config::load(file.path()).expect("should parse");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.database.driver, DatabaseDriver::Mysql);
        assert_eq!(config.database.url, "mysql://localhost/courses");
        // Unset sections fall back to defaults
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_load_invalid_yaml() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "server: [not a mapping").expect("write config");

        let result = Config::load(file.path());
        assert!(result.is_err());
    }
}
