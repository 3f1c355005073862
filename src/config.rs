//! Application configuration module
//!
//! Handles loading and validating configuration from environment variables.

use crate::history::DEFAULT_HISTORY_CAPACITY;
use crate::sync::csv_import::DEFAULT_IMPORT_SPACING;
use serde::Deserialize;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: Ipv4Addr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::new(0, 0, 0, 0),
            port: 3000,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:3001".to_string()],
        }
    }
}

/// Lineage engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LineageConfig {
    /// Maximum undo/redo entries kept
    pub history_capacity: usize,
    /// Horizontal gap between tables created by a CSV import
    pub import_spacing: f64,
    /// Document loaded at start-up and used as the default save target
    pub document_path: Option<PathBuf>,
}

impl Default for LineageConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            import_spacing: DEFAULT_IMPORT_SPACING,
            document_path: None,
        }
    }
}

/// Complete application settings
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub lineage: LineageConfig,
}

impl Settings {
    /// Load settings from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists (ignore errors if file not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server = ServerConfig {
            host: lookup("HOST")
                .and_then(|h| h.parse().ok())
                .unwrap_or_else(|| ServerConfig::default().host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(|| ServerConfig::default().port),
        };

        let cors = CorsConfig {
            allowed_origins: lookup("ALLOWED_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|| CorsConfig::default().allowed_origins),
        };

        let history_capacity: usize =
            parse_var(&lookup, "LINEAGE_HISTORY_CAPACITY")?.unwrap_or(DEFAULT_HISTORY_CAPACITY);
        if history_capacity == 0 {
            return Err(ConfigError::InvalidValue(
                "LINEAGE_HISTORY_CAPACITY must be at least 1".to_string(),
            ));
        }

        let import_spacing: f64 =
            parse_var(&lookup, "LINEAGE_IMPORT_SPACING")?.unwrap_or(DEFAULT_IMPORT_SPACING);
        if !(import_spacing.is_finite() && import_spacing > 0.0) {
            return Err(ConfigError::InvalidValue(
                "LINEAGE_IMPORT_SPACING must be a positive number".to_string(),
            ));
        }

        let lineage = LineageConfig {
            history_capacity,
            import_spacing,
            document_path: lookup("LINEAGE_DOCUMENT")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        };

        Ok(Self {
            server,
            cors,
            lineage,
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(format!("{} has invalid value '{}'", key, raw))),
        None => Ok(None),
    }
}
