//! Configuration structs.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use folio_telemetry::LogConfig;

use crate::ConfigError;

/// Top-level Folio site configuration.
///
/// Every section has defaults, so an empty file is a valid configuration.
/// Unknown fields are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FolioConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingSection,

    /// Per page type settings, keyed by page type name.
    #[serde(default)]
    pub page_types: IndexMap<String, PageTypeSettings>,
}

impl FolioConfig {
    /// Development preset: verbose pretty logs.
    #[must_use]
    pub fn development() -> Self {
        Self {
            logging: LoggingSection::development(),
            page_types: IndexMap::new(),
        }
    }

    /// Production preset: JSON logs at `info`.
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }

    /// Checks values serde cannot check.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logging.validate()?;
        for (name, settings) in &self.page_types {
            if name.trim().is_empty() {
                return Err(ConfigError::invalid_value(
                    "page_types",
                    "page type name must not be empty",
                ));
            }
            settings.validate(name)?;
        }
        Ok(())
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON lines.
    #[default]
    Json,
    /// Human-readable output.
    Pretty,
}

/// The `[logging]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive, e.g. `info` or `folio_dispatch=trace,info`.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Log span open and close events.
    #[serde(default)]
    pub span_events: bool,

    /// Include source file and line.
    #[serde(default)]
    pub file_line_info: bool,

    /// Include the event target.
    #[serde(default = "default_true")]
    pub include_target: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::Json,
            span_events: false,
            file_line_info: false,
            include_target: true,
        }
    }
}

impl LoggingSection {
    fn development() -> Self {
        Self {
            enabled: true,
            level: "debug".to_string(),
            format: LogFormat::Pretty,
            span_events: true,
            file_line_info: true,
            include_target: true,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.level.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "logging.level",
                "must not be empty",
            ));
        }
        Ok(())
    }
}

impl From<&LoggingSection> for LogConfig {
    fn from(section: &LoggingSection) -> Self {
        Self {
            enabled: section.enabled,
            level: section.level.clone(),
            json_format: section.format == LogFormat::Json,
            span_events: section.span_events,
            file_line_info: section.file_line_info,
            include_target: section.include_target,
        }
    }
}

/// Settings applied to one page type when a site builds its registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PageTypeSettings {
    /// Label shown in the page type choices.
    #[serde(default)]
    pub label: Option<String>,

    /// Asset scene set on every request the page type serves.
    #[serde(default)]
    pub scene: Option<String>,

    /// Template used by the catch-all dispatch.
    #[serde(default)]
    pub template: Option<String>,
}

impl PageTypeSettings {
    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        let fields = [
            ("label", &self.label),
            ("scene", &self.scene),
            ("template", &self.template),
        ];
        for (field, value) in fields {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(ConfigError::invalid_value(
                    format!("page_types.{name}.{field}"),
                    "must not be empty when set",
                ));
            }
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}
