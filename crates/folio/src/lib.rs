//! # Folio
//!
//! Page-type URL dispatch and array field editing for a content management
//! system.
//!
//! - **Dispatch**: routes the part of a URL below a resolved page through
//!   Express-style patterns, ordered middleware and a handler
//! - **Array editor**: the state model behind form controls that edit
//!   arrays of sub-documents
//! - **Configuration**: page type labels, scenes and templates from TOML,
//!   JSON or the environment
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use folio::prelude::*;
//!
//! let config = ConfigLoader::new()
//!     .with_optional_file("folio.toml")?
//!     .with_env_prefix("FOLIO")
//!     .load()?;
//! init_logging(&(&config.logging).into())?;
//!
//! let mut poets = PageType::new("poet-page");
//! poets.dispatch("/:poet", SetTemplate::new("show"))?;
//!
//! let registry = folio::site::build_registry(&config, vec![poets])?;
//! let outcome = registry.serve(&mut request).await?;
//! ```

#![doc(html_root_url = "https://docs.rs/folio/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use folio_core as core;

// Re-export pattern compilation
pub use folio_router as router;

// Re-export page type dispatch
pub use folio_dispatch as dispatch;

// Re-export schema and the array editor
pub use folio_schema as schema;

// Re-export configuration
pub use folio_config as config;

// Re-export logging and metrics
pub use folio_telemetry as telemetry;

pub mod site;

/// Prelude module for convenient imports.
///
/// ```rust
/// use folio::prelude::*;
/// ```
pub mod prelude {
    pub use folio_core::{FolioError, FolioResult, Mode, Page, PageRequest, Position};

    pub use folio_router::{Params, PathPattern};

    pub use folio_dispatch::{
        DispatchMiddleware, DispatchOutcome, Flow, FnHandler, FnMiddleware, PageHandler,
        PageType, PageTypeRegistry, SetTemplate,
    };

    pub use folio_schema::{
        ArrayEditor, ArrayFailure, ArrayItem, Field, FieldType, ModalHost,
    };

    pub use folio_config::{ConfigLoader, FolioConfig};

    pub use folio_telemetry::{init_logging, LogConfig};
}
