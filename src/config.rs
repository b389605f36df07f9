//! # Configuration Management
//!
//! Centralized configuration for the wire-protocol core.
//!
//! This module provides structured configuration for the codec (frame limits, text fallback
//! policy, strictness), the entitlement resolver (default courses, operator toggles), and
//! logging.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment-specific overrides via `from_env()`
//!
//! ## Example
//! ```toml
//! [codec]
//! max_payload_size = 65535
//! padded_string_fallback = "error"
//! reject_trailing_bytes = true
//!
//! [courses]
//! default_courses = ["Trial"]
//! enabled = [{ name = "HunterLife", enabled = true }]
//! ```

use crate::course;
use crate::error::{ProtocolError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::Level;

/// Largest body a packet header can describe (`dataSize` is a u16)
pub const MAX_PAYLOAD_SIZE: usize = u16::MAX as usize;

/// Main configuration structure that contains all configurable settings
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ProtocolConfig {
    /// Codec configuration
    #[serde(default)]
    pub codec: CodecConfig,

    /// Entitlement configuration
    #[serde(default)]
    pub courses: CourseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ProtocolConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(size) = std::env::var("MHF_PROTOCOL_MAX_PAYLOAD_SIZE") {
            config.codec.max_payload_size = parse_payload_size(&size)?;
        }

        if let Ok(policy) = std::env::var("MHF_PROTOCOL_PADDED_STRING_FALLBACK") {
            config.codec.padded_string_fallback = match policy.to_ascii_lowercase().as_str() {
                "zero_fill" | "zerofill" => PaddedStringFallback::ZeroFill,
                "error" => PaddedStringFallback::Error,
                other => {
                    return Err(ProtocolError::ConfigError(format!(
                        "Invalid padded string fallback: {other}"
                    )))
                }
            };
        }

        if let Ok(courses) = std::env::var("MHF_PROTOCOL_DEFAULT_COURSES") {
            config.courses.default_courses = courses
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(String::from)
                .collect();
        }

        if let Ok(level) = std::env::var("MHF_PROTOCOL_LOG_LEVEL") {
            config.logging.log_level = level
                .parse::<Level>()
                .map_err(|_| ProtocolError::ConfigError(format!("Invalid log level: {level}")))?;
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.codec.validate());
        errors.extend(self.courses.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProtocolError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// What to write when a fixed-size padded string cannot be transcoded to Shift-JIS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaddedStringFallback {
    /// Emit a zero-filled field of the requested size (legacy wire behaviour)
    ZeroFill,
    /// Fail the build with `TranscodingFailure`
    #[default]
    Error,
}

/// Codec configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CodecConfig {
    /// Maximum accepted packet body size in bytes
    pub max_payload_size: usize,

    /// Policy for padded strings that fail to transcode
    #[serde(default)]
    pub padded_string_fallback: PaddedStringFallback,

    /// Whether dispatch rejects messages that leave bytes unconsumed
    #[serde(default = "default_true")]
    pub reject_trailing_bytes: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_payload_size: MAX_PAYLOAD_SIZE,
            padded_string_fallback: PaddedStringFallback::default(),
            reject_trailing_bytes: true,
        }
    }
}

impl CodecConfig {
    /// Validate codec configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_payload_size == 0 {
            errors.push("Max payload size cannot be 0".to_string());
        } else if self.max_payload_size > MAX_PAYLOAD_SIZE {
            errors.push(format!(
                "Max payload size too large: {} bytes (header limit: {MAX_PAYLOAD_SIZE})",
                self.max_payload_size
            ));
        }

        errors
    }
}

/// A named course an operator can switch on or off
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CourseToggle {
    pub name: String,
    pub enabled: bool,
}

/// Entitlement configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CourseConfig {
    /// Course aliases every character owns regardless of its rights mask
    pub default_courses: Vec<String>,

    /// Courses players may toggle on themselves
    #[serde(default)]
    pub enabled: Vec<CourseToggle>,
}

impl Default for CourseConfig {
    fn default() -> Self {
        Self {
            default_courses: vec![String::from("Trial")],
            enabled: Vec::new(),
        }
    }
}

impl CourseConfig {
    /// Resolve the configured default aliases to course IDs, skipping unknown names.
    pub fn default_course_ids(&self) -> Vec<u16> {
        self.default_courses
            .iter()
            .filter_map(|name| course::find_by_alias(name))
            .collect()
    }

    /// Whether the course named `name` (any alias) is switched on.
    pub fn is_enabled(&self, name: &str) -> bool {
        let Some(id) = course::find_by_alias(name) else {
            return false;
        };
        self.enabled
            .iter()
            .any(|toggle| toggle.enabled && course::find_by_alias(&toggle.name) == Some(id))
    }

    /// Validate entitlement configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for name in &self.default_courses {
            if course::find_by_alias(name).is_none() {
                errors.push(format!("Unknown default course: '{name}'"));
            }
        }

        for toggle in &self.enabled {
            if course::find_by_alias(&toggle.name).is_none() {
                errors.push(format!("Unknown course toggle: '{}'", toggle.name));
            }
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to log to console
    pub log_to_console: bool,

    /// Whether to log to file
    pub log_to_file: bool,

    /// Path to log file (if log_to_file is true)
    pub log_file_path: Option<String>,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("mhf-protocol"),
            log_level: Level::INFO,
            log_to_console: true,
            log_to_file: false,
            log_file_path: None,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        if self.log_to_file {
            if let Some(ref path) = self.log_file_path {
                if let Some(parent) = Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        errors.push(format!(
                            "Log file directory does not exist: {}",
                            parent.display()
                        ));
                    }
                }
            } else {
                errors.push("log_file_path must be specified when log_to_file is true".to_string());
            }
        }

        if !self.log_to_console && !self.log_to_file {
            errors
                .push("At least one logging output (console or file) must be enabled".to_string());
        }

        errors
    }
}

fn parse_payload_size(value: &str) -> Result<usize> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| ProtocolError::ConfigError(format!("Invalid max payload size: {value}")))
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_course_ids() {
        let config = CourseConfig {
            default_courses: vec!["Trial".into(), "hl".into(), "Nope".into()],
            enabled: Vec::new(),
        };
        assert_eq!(config.default_course_ids(), vec![1, 2]);
    }

    #[test]
    fn test_is_enabled_matches_any_alias() {
        let config = CourseConfig {
            default_courses: Vec::new(),
            enabled: vec![
                CourseToggle {
                    name: "HunterLife".into(),
                    enabled: true,
                },
                CourseToggle {
                    name: "EX".into(),
                    enabled: false,
                },
            ],
        };
        assert!(config.is_enabled("HL"));
        assert!(!config.is_enabled("Extra"));
        assert!(!config.is_enabled("Unknown"));
    }

    #[test]
    fn test_payload_size_env_value() {
        assert_eq!(parse_payload_size("4096").unwrap(), 4096);
        assert_eq!(parse_payload_size(" 512 ").unwrap(), 512);
        for bad in ["", "big", "-1", "1.5"] {
            assert!(matches!(
                parse_payload_size(bad),
                Err(ProtocolError::ConfigError(_))
            ));
        }
    }

    #[test]
    fn test_from_env_rejects_bad_payload_size() {
        std::env::set_var("MHF_PROTOCOL_MAX_PAYLOAD_SIZE", "lots");
        let result = ProtocolConfig::from_env();
        std::env::remove_var("MHF_PROTOCOL_MAX_PAYLOAD_SIZE");
        assert!(matches!(result, Err(ProtocolError::ConfigError(_))));
    }

    #[test]
    fn test_toml_roundtrip_of_example() {
        let example = ProtocolConfig::example_config();
        let parsed = ProtocolConfig::from_toml(&example).unwrap();
        assert_eq!(parsed.codec.max_payload_size, MAX_PAYLOAD_SIZE);
        assert_eq!(parsed.courses.default_courses, vec!["Trial".to_string()]);
    }
}
