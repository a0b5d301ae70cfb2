//! Error types for Folio.
//!
//! [`FolioError`] is what page handlers, dispatch middleware, and external
//! collaborators (page stores, modal hosts) return. Dispatch itself never
//! produces an error for an unmatched URL: that is a not-found flag on the
//! request.

use thiserror::Error;

/// Result type alias using [`FolioError`].
pub type FolioResult<T> = Result<T, FolioError>;

/// Standard error type for Folio.
///
/// # Example
///
/// ```
/// use folio_core::FolioError;
///
/// fn load_poet(name: &str) -> Result<(), FolioError> {
///     if name.is_empty() {
///         return Err(FolioError::validation("poet name cannot be empty"));
///     }
///     Ok(())
/// }
///
/// assert!(load_poet("").is_err());
/// ```
#[derive(Error, Debug)]
pub enum FolioError {
    /// Input rejected by a handler.
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable error message.
        message: String,
    },

    /// A page type or module was configured incorrectly.
    ///
    /// These are raised while the application is being assembled and are
    /// meant to stop startup.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Human-readable error message.
        message: String,
    },

    /// A document store collaborator failed.
    #[error("Store error: {message}")]
    Store {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        #[source]
        source: Option<anyhow::Error>,
    },

    /// A handler or middleware failed.
    #[error("Handler error: {message}")]
    Handler {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl FolioError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a store error.
    #[must_use]
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a store error with a source error.
    pub fn store_with_source(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::Store {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Creates a handler error.
    #[must_use]
    pub fn handler(message: impl Into<String>) -> Self {
        Self::Handler {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a handler error with a source error.
    pub fn handler_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Handler {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Validation { message }
            | Self::Configuration { message }
            | Self::Store { message, .. }
            | Self::Handler { message, .. } => message,
        }
    }

    /// Returns true for startup configuration failures.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}
