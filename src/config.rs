//! # Engine Configuration Module
//!
//! Constants shared by the formatting and aggregation code, and the runtime
//! configuration read by the `bakehouse` binary.

use std::path::PathBuf;
use std::str::FromStr;

use crate::errors::{ConfigError, TemplateError};
use crate::timeline::TemplateRegistry;

// Display and rounding constants
pub const KG_DISPLAY_THRESHOLD_GRAMS: f64 = 1000.0;
pub const DISPLAY_DECIMAL_PLACES: usize = 2;
pub const SHOPPING_DECIMAL_PLACES: i32 = 2;

/// Furthest a template step may start or end from the bake, one year
pub const MAX_TEMPLATE_OFFSET_MINUTES: i64 = 366 * 24 * 60;

// Environment keys read by `EngineConfig::from_env`
pub const TEMPLATES_PATH_ENV: &str = "BAKEHOUSE_TEMPLATES";
pub const LOG_FORMAT_ENV: &str = "BAKEHOUSE_LOG_FORMAT";
pub const DEFAULT_LOG_FILTER: &str = "bakehouse=info";

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable, one line per event
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::InvalidValue {
                key: LOG_FORMAT_ENV.to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Runtime configuration for the engine's binary front end
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Optional JSON file with additional timeline templates
    pub templates_path: Option<PathBuf>,
    /// Log line format
    pub log_format: LogFormat,
    /// Filter directive used when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            templates_path: None,
            log_format: LogFormat::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl EngineConfig {
    /// Read configuration from process environment variables.
    ///
    /// Engine operations never consult the environment; only the binary calls this.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bakehouse::config::{EngineConfig, LogFormat};
    ///
    /// let config = EngineConfig::from_lookup(|key| match key {
    ///     "BAKEHOUSE_LOG_FORMAT" => Some("json".to_string()),
    ///     _ => None,
    /// })?;
    /// assert_eq!(config.log_format, LogFormat::Json);
    /// # Ok::<(), bakehouse::errors::ConfigError>(())
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(TEMPLATES_PATH_ENV) {
            let path = path.trim();
            if !path.is_empty() {
                config.templates_path = Some(PathBuf::from(path));
            }
        }

        if let Some(format) = lookup(LOG_FORMAT_ENV) {
            config.log_format = format.parse()?;
        }

        Ok(config)
    }

    /// Built-in templates plus any configured custom template file
    pub fn template_registry(&self) -> Result<TemplateRegistry, TemplateError> {
        match &self.templates_path {
            Some(path) => TemplateRegistry::with_custom_file(path),
            None => Ok(TemplateRegistry::builtin().clone()),
        }
    }
}
