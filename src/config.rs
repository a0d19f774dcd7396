//! Configuration for the query server.
//!
//! Settings come from an optional TOML file and from command-line flags,
//! with flags taking precedence:
//!
//! ```toml
//! [server]
//! database = "data.db"
//! host = "127.0.0.1"
//! port = 3601
//! readonly = true
//! max_body_bytes = 16777216
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants;

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Non-fatal warnings that should be logged but don't prevent operation.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Returns true if there are any warnings.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Root of a `sqlkv.toml` file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub server: ServerSettings,
}

impl ConfigFile {
    /// Load configuration from the specified path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read (IO error)
    /// - The file contains invalid TOML syntax
    /// - Unknown keys or values of the wrong type are present
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

/// Partially specified server settings, as read from a file or from flags.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSettings {
    pub database: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub readonly: Option<bool>,
    pub max_body_bytes: Option<usize>,
}

impl ServerSettings {
    /// Fill every unset field from `fallback`.
    #[must_use]
    pub fn or(self, fallback: Self) -> Self {
        Self {
            database: self.database.or(fallback.database),
            host: self.host.or(fallback.host),
            port: self.port.or(fallback.port),
            readonly: self.readonly.or(fallback.readonly),
            max_body_bytes: self.max_body_bytes.or(fallback.max_body_bytes),
        }
    }

    /// Apply defaults and produce a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if no database file was given.
    pub fn resolve(self) -> Result<ServerConfig> {
        let database = self
            .database
            .context("No database file given (pass <FILE> or set server.database)")?;

        Ok(ServerConfig {
            database,
            host: self
                .host
                .unwrap_or_else(|| constants::DEFAULT_HOST.to_string()),
            port: self.port.unwrap_or(constants::DEFAULT_PORT),
            readonly: self.readonly.unwrap_or(true),
            max_body_bytes: self
                .max_body_bytes
                .unwrap_or(constants::DEFAULT_MAX_BODY_BYTES),
        })
    }
}

/// Fully resolved query server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Database file every request opens.
    pub database: PathBuf,
    pub host: String,
    pub port: u16,
    /// Open the database with the engine's readonly flag.
    pub readonly: bool,
    /// Largest accepted request body.
    pub max_body_bytes: usize,
}

impl ServerConfig {
    /// Defaults for the given database: loopback, port 3601, readonly.
    pub fn new(database: impl Into<PathBuf>) -> Self {
        Self {
            database: database.into(),
            host: constants::DEFAULT_HOST.to_string(),
            port: constants::DEFAULT_PORT,
            readonly: true,
            max_body_bytes: constants::DEFAULT_MAX_BODY_BYTES,
        }
    }

    #[must_use]
    pub fn with_readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    /// `host:port` listen address.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validate configuration.
    ///
    /// Returns a `ValidationResult` containing any non-fatal warnings.
    ///
    /// # Errors
    ///
    /// Returns an error if the port or body limit is zero, or the database
    /// path points at a directory.
    pub fn validate(&self) -> Result<ValidationResult> {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if self.port == 0 {
            errors.push("Server port cannot be 0. Use a valid port number (1-65535)".to_string());
        } else if self.port < 1024 {
            warnings.push(format!(
                "Server port {} is a system/privileged port (< 1024)",
                self.port
            ));
        }

        if self.max_body_bytes == 0 {
            errors.push("max_body_bytes cannot be 0".to_string());
        }

        if self.database.is_dir() {
            errors.push(format!(
                "Database path is a directory: {}",
                self.database.display()
            ));
        } else if !self.database.exists() {
            warnings.push(format!(
                "Database file does not exist: {}{}",
                self.database.display(),
                if self.readonly {
                    " (every request will fail until it is created)"
                } else {
                    ""
                }
            ));
        }

        if !self.readonly && self.host != constants::DEFAULT_HOST {
            warnings.push(format!(
                "Writes are enabled and the server listens on {}; the endpoint has no authentication",
                self.host
            ));
        }

        if !errors.is_empty() {
            anyhow::bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            );
        }

        Ok(ValidationResult { warnings })
    }
}
