//! Dispatch error types.

use folio_core::FolioError;
use folio_router::PatternError;
use folio_schema::SchemaError;
use thiserror::Error;

/// Errors raised while assembling page types or replaying page placement.
///
/// An unmatched URL is never an error; it sets
/// [`PageRequest::not_found`](folio_core::PageRequest::not_found).
#[derive(Error, Debug)]
pub enum DispatchError {
    /// A dispatch pattern could not be compiled.
    #[error("invalid dispatch pattern: {0}")]
    InvalidPattern(#[from] PatternError),

    /// A page type defines a field whose name is reserved for the page tree.
    #[error("page type `{page_type}`: the field name `{field}` is forbidden")]
    ForbiddenField {
        /// Page type name.
        page_type: String,
        /// The offending field name.
        field: String,
    },

    /// A field definition is invalid.
    #[error("invalid field: {0}")]
    InvalidField(#[from] SchemaError),

    /// Two page types share a name.
    #[error("page type `{name}` is already registered")]
    DuplicatePageType {
        /// Page type name.
        name: String,
    },

    /// A non-home page has no recorded placement to replay.
    #[error(
        "page `{page_id}` was inserted without the page APIs and has no last target id \
         and position; cannot insert its {mode} counterpart"
    )]
    MissingPlacement {
        /// Id of the page lacking placement metadata.
        page_id: String,
        /// Mode of the counterpart that could not be inserted.
        mode: &'static str,
    },

    /// A collaborator failed.
    #[error(transparent)]
    Folio(#[from] FolioError),
}

impl DispatchError {
    /// Creates a forbidden field error.
    pub fn forbidden_field(page_type: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ForbiddenField {
            page_type: page_type.into(),
            field: field.into(),
        }
    }

    /// Returns true for errors that should stop application startup.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidPattern(_)
                | Self::ForbiddenField { .. }
                | Self::InvalidField(_)
                | Self::DuplicatePageType { .. }
        )
    }
}

impl From<DispatchError> for FolioError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Folio(inner) => inner,
            DispatchError::MissingPlacement { .. } => Self::store(err.to_string()),
            other => Self::configuration(other.to_string()),
        }
    }
}
