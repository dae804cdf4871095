use crate::viewport::{FitMode, Size};
use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub surface: SurfaceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "pretty"
    pub file_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}

/// Initial state of a video surface
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub fit_mode: FitMode,
    pub mirror: bool,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            fit_mode: FitMode::Fill,
            mirror: false,
            viewport_width: 1280.0,
            viewport_height: 720.0,
        }
    }
}

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "warning", "error"];
const LOG_FORMATS: [&str; 2] = ["pretty", "json"];

impl Config {
    /// Load configuration from multiple sources with priority:
    /// 1. Environment variables (highest priority)
    /// 2. Config file (if provided; it must exist)
    /// 3. Defaults (lowest priority)
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = config_file {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // ROOMKIT_LOGGING__LEVEL, ROOMKIT_SURFACE__FIT_MODE, ...
        builder = builder.add_source(
            Environment::with_prefix("ROOMKIT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load from environment variables only
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        Self::load(Some(path))
    }

    /// Check values that deserialize fine but cannot be used
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        let level = self.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            errors.push(format!("logging.level: unknown level '{}'", self.logging.level));
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            errors.push(format!(
                "logging.format: expected 'pretty' or 'json', got '{}'",
                self.logging.format
            ));
        }
        if Size::new(self.surface.viewport_width, self.surface.viewport_height).is_none() {
            errors.push(format!(
                "surface: viewport must be positive, got {}x{}",
                self.surface.viewport_width, self.surface.viewport_height
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.surface.fit_mode, FitMode::Fill);
        assert!(!config.surface.mirror);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "logging:\n  level: debug\n  format: json\nsurface:\n  fit_mode: fit\n  mirror: true\n  viewport_width: 640\n"
        )
        .unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let config = Config::from_file(&path).unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.surface.fit_mode, FitMode::Fit);
        assert!(config.surface.mirror);
        assert_eq!(config.surface.viewport_width, 640.0);
        assert_eq!(config.surface.viewport_height, 720.0);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        assert!(Config::load(Some("/nonexistent/roomkit.yaml")).is_err());
        assert!(Config::from_file("/nonexistent/typo.yaml").is_err());
    }

    #[test]
    fn test_no_file_uses_defaults() {
        let config = Config::load(None).unwrap();
        assert_eq!(config.surface.fit_mode, FitMode::Fill);
    }

    #[test]
    fn test_validate_collects_errors() {
        let config = Config {
            logging: LoggingConfig {
                level: "loud".to_string(),
                format: "xml".to_string(),
                file_path: None,
            },
            surface: SurfaceConfig {
                viewport_width: 0.0,
                ..SurfaceConfig::default()
            },
        };

        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("loud"));
    }
}
