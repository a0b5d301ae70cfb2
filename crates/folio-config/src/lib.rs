//! Typed configuration for Folio sites.
//!
//! - TOML and JSON files
//! - `FOLIO__SECTION__KEY` environment overrides
//! - Strict parsing: unknown fields are errors
//!
//! # Configuration File Format
//!
//! ```toml
//! [logging]
//! level = "info"
//! format = "json"
//!
//! [page_types.poet-page]
//! label = "Poets"
//! scene = "apos"
//! template = "poets"
//! ```
//!
//! # Example
//!
//! ```no_run
//! use folio_config::ConfigLoader;
//!
//! # fn main() -> Result<(), folio_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_optional_file("folio.toml")?
//!     .with_env_prefix("FOLIO")
//!     .load()?;
//!
//! let log_config: folio_telemetry::LogConfig = (&config.logging).into();
//! # Ok(())
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/folio-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;

pub use config::{FolioConfig, LogFormat, LoggingSection, PageTypeSettings};
pub use error::ConfigError;
pub use loader::{parse_bool, ConfigLoader};
