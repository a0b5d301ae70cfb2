//! Layered configuration loading.
//!
//! Layers apply in order, later layers overriding earlier ones:
//! 1. Built-in defaults or a preset
//! 2. A TOML or JSON file
//! 3. `PREFIX__SECTION__KEY` environment variables

use std::env;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::{ConfigError, FolioConfig, LogFormat, PageTypeSettings};

/// Builds a [`FolioConfig`] from defaults, files and the environment.
///
/// # Example
///
/// ```no_run
/// use folio_config::ConfigLoader;
///
/// # fn main() -> Result<(), folio_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_defaults()
///     .with_optional_file("folio.toml")?
///     .with_env_prefix("FOLIO")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: FolioConfig,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader holding the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: FolioConfig::default(),
            env_prefix: None,
        }
    }

    /// Resets to the default configuration.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = FolioConfig::default();
        self
    }

    /// Starts from the development preset.
    ///
    /// ```
    /// use folio_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new().with_development().load().unwrap();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = FolioConfig::development();
        self
    }

    /// Starts from the production preset.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = FolioConfig::production();
        self
    }

    /// Loads a `.toml` or `.json` file, chosen by extension.
    ///
    /// The file replaces the current configuration; sections it omits take
    /// their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is missing, unreadable, has an
    /// unsupported extension or does not parse.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;
        self.config = Self::parse_file(&content, path)?;
        debug!(path = %path.display(), "configuration file loaded");
        Ok(self)
    }

    /// Like [`with_file`](Self::with_file), but a missing file is skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be loaded.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Loads configuration from a string in `format` (`toml` or `json`).
    ///
    /// ```
    /// use folio_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string("[page_types.poet-page]\nscene = \"apos\"\n", "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.page_types["poet-page"].scene.as_deref(), Some("apos"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unknown format or a parse failure.
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = match format.to_lowercase().as_str() {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            _ => return Err(ConfigError::unsupported_format(format)),
        };
        Ok(self)
    }

    /// Enables environment overrides named `PREFIX__SECTION__KEY`.
    ///
    /// - `FOLIO__LOGGING__LEVEL=debug`
    /// - `FOLIO__PAGE_TYPES__POET_PAGE__SCENE=apos`
    ///
    /// Page type names are lowercased and `_` becomes `-`, so `POET_PAGE`
    /// addresses `poet-page`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Applies environment overrides and validates.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unparseable override or an invalid
    /// final configuration.
    pub fn load(mut self) -> Result<FolioConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_overrides(&prefix, env::vars())?;
        }
        self.config.validate()?;
        Ok(self.config)
    }

    /// Returns the configuration without overrides or validation.
    #[must_use]
    pub fn load_unvalidated(self) -> FolioConfig {
        self.config
    }

    fn parse_file(content: &str, path: &Path) -> Result<FolioConfig, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("toml") => Ok(toml::from_str(content)?),
            Some("json") => Ok(serde_json::from_str(content)?),
            _ => Err(ConfigError::unsupported_format(path.display().to_string())),
        }
    }

    fn apply_overrides<I>(&mut self, prefix: &str, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let scoped = format!("{prefix}__");
        let mut vars: Vec<_> = vars
            .into_iter()
            .filter(|(k, _)| k.starts_with(&scoped))
            .collect();
        // Page type entries are created in a stable order.
        vars.sort();

        for (key, value) in vars {
            self.apply_env_var(&key, &value, prefix)?;
        }
        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let rest = key
            .strip_prefix(prefix)
            .and_then(|k| k.strip_prefix("__"))
            .ok_or_else(|| ConfigError::env_parse_error(key, "invalid key format"))?;

        let parts: Vec<&str> = rest.split("__").collect();
        let logging = &mut self.config.logging;

        match parts.as_slice() {
            ["LOGGING", "ENABLED"] => logging.enabled = bool_var(key, value)?,
            ["LOGGING", "LEVEL"] => logging.level = value.to_string(),
            ["LOGGING", "FORMAT"] => {
                logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => {
                        return Err(ConfigError::env_parse_error(
                            key,
                            "expected 'json' or 'pretty'",
                        ))
                    }
                };
            }
            ["LOGGING", "SPAN_EVENTS"] => logging.span_events = bool_var(key, value)?,
            ["LOGGING", "FILE_LINE_INFO"] => logging.file_line_info = bool_var(key, value)?,
            ["LOGGING", "INCLUDE_TARGET"] => logging.include_target = bool_var(key, value)?,

            ["PAGE_TYPES", name, setting] if !name.is_empty() => {
                let settings = self
                    .config
                    .page_types
                    .entry(page_type_name(name))
                    .or_insert_with(PageTypeSettings::default);
                let slot = match *setting {
                    "LABEL" => &mut settings.label,
                    "SCENE" => &mut settings.scene,
                    "TEMPLATE" => &mut settings.template,
                    _ => return Err(ConfigError::env_parse_error(key, "unknown page type setting")),
                };
                *slot = (!value.is_empty()).then(|| value.to_string());
            }

            _ => return Err(ConfigError::env_parse_error(key, "unknown configuration key")),
        }
        Ok(())
    }
}

fn page_type_name(var_segment: &str) -> String {
    var_segment.to_lowercase().replace('_', "-")
}

fn bool_var(key: &str, value: &str) -> Result<bool, ConfigError> {
    parse_bool(value).ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))
}

/// Parses `true/1/yes/on` and `false/0/no/off`, ignoring case.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(config, FolioConfig::default());
    }

    #[test]
    fn test_presets() {
        let config = ConfigLoader::new().with_development().load().unwrap();
        assert_eq!(config.logging.format, LogFormat::Pretty);

        let config = ConfigLoader::new()
            .with_development()
            .with_production()
            .load()
            .unwrap();
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_toml_file() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"
            [logging]
            level = "folio_dispatch=trace,info"
            format = "pretty"

            [page_types.poet-page]
            label = "Poets"
            scene = "apos"
            template = "poets"
            "#
        )
        .unwrap();

        let config = ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap();

        assert_eq!(config.logging.level, "folio_dispatch=trace,info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        let poets = &config.page_types["poet-page"];
        assert_eq!(poets.label.as_deref(), Some("Poets"));
        assert_eq!(poets.template.as_deref(), Some("poets"));
    }

    #[test]
    fn test_json_file() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        write!(
            file,
            r#"{{"page_types": {{"default-page": {{"template": "page"}}}}}}"#
        )
        .unwrap();

        let config = ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap();
        assert_eq!(
            config.page_types["default-page"].template.as_deref(),
            Some("page")
        );
        assert!(config.logging.enabled);
    }

    #[test]
    fn test_missing_file() {
        let err = ConfigLoader::new()
            .with_file("/nonexistent/folio.toml")
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_optional_missing_file_is_skipped() {
        let config = ConfigLoader::new()
            .with_optional_file("/nonexistent/folio.toml")
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(config, FolioConfig::default());
    }

    #[test]
    fn test_unsupported_extension() {
        let file = NamedTempFile::with_suffix(".yaml").unwrap();
        let err = ConfigLoader::new().with_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_invalid_toml() {
        let err = ConfigLoader::new()
            .with_string("[logging\nlevel = ", "toml")
            .unwrap_err();
        assert!(matches!(err, ConfigError::TomlError(_)));
    }

    #[test]
    fn test_unknown_format() {
        let err = ConfigLoader::new().with_string("", "ini").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_load_validates() {
        let result = ConfigLoader::new()
            .with_string("[logging]\nlevel = \"\"\n", "toml")
            .unwrap()
            .load();
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_load_unvalidated_skips_validation() {
        let config = ConfigLoader::new()
            .with_string("[logging]\nlevel = \"\"\n", "toml")
            .unwrap()
            .load_unvalidated();
        assert!(config.logging.level.is_empty());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("YES"), Some(true));
        assert_eq!(parse_bool("on"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn test_logging_overrides() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_overrides(
                "FOLIO",
                vars(&[
                    ("FOLIO__LOGGING__LEVEL", "debug"),
                    ("FOLIO__LOGGING__FORMAT", "Pretty"),
                    ("FOLIO__LOGGING__SPAN_EVENTS", "yes"),
                    ("UNRELATED", "1"),
                ]),
            )
            .unwrap();

        let logging = &loader.config.logging;
        assert_eq!(logging.level, "debug");
        assert_eq!(logging.format, LogFormat::Pretty);
        assert!(logging.span_events);
    }

    #[test]
    fn test_page_type_overrides() {
        let mut loader = ConfigLoader::new()
            .with_string("[page_types.poet-page]\nlabel = \"Poets\"\n", "toml")
            .unwrap();
        loader
            .apply_overrides(
                "FOLIO",
                vars(&[
                    ("FOLIO__PAGE_TYPES__POET_PAGE__SCENE", "apos"),
                    ("FOLIO__PAGE_TYPES__BLOG__TEMPLATE", "blog-index"),
                ]),
            )
            .unwrap();

        let poets = &loader.config.page_types["poet-page"];
        assert_eq!(poets.label.as_deref(), Some("Poets"));
        assert_eq!(poets.scene.as_deref(), Some("apos"));
        assert_eq!(
            loader.config.page_types["blog"].template.as_deref(),
            Some("blog-index")
        );
    }

    #[test]
    fn test_empty_override_clears_setting() {
        let mut loader = ConfigLoader::new()
            .with_string("[page_types.poet-page]\nscene = \"apos\"\n", "toml")
            .unwrap();
        loader
            .apply_env_var("FOLIO__PAGE_TYPES__POET_PAGE__SCENE", "", "FOLIO")
            .unwrap();
        assert_eq!(loader.config.page_types["poet-page"].scene, None);
    }

    #[test]
    fn test_bad_overrides_rejected() {
        let mut loader = ConfigLoader::new();
        assert!(loader
            .apply_env_var("FOLIO__LOGGING__ENABLED", "sometimes", "FOLIO")
            .is_err());
        assert!(loader
            .apply_env_var("FOLIO__LOGGING__FORMAT", "xml", "FOLIO")
            .is_err());
        assert!(loader
            .apply_env_var("FOLIO__PAGE_TYPES__POET_PAGE__LAYOUT", "wide", "FOLIO")
            .is_err());
        assert!(loader
            .apply_env_var("FOLIO__SERVER__ADDR", "0.0.0.0:80", "FOLIO")
            .is_err());
    }
}
