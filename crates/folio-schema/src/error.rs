//! Schema error types.

use thiserror::Error;

/// Errors raised by schema definitions and the array editor.
///
/// Validation failures of user input are not errors; they are reported as
/// [`ArrayFailure`](crate::ArrayFailure) codes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A field definition contradicts itself.
    #[error("invalid definition for field `{field}`: {reason}")]
    InvalidDefinition {
        /// Field name.
        field: String,
        /// What is wrong.
        reason: String,
    },

    /// An operation named an item the editor does not hold.
    #[error("no array item with id `{id}`")]
    UnknownItem {
        /// The requested id.
        id: String,
    },

    /// An item index was out of range.
    #[error("item index {index} out of range for {len} items")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of items.
        len: usize,
    },
}

impl SchemaError {
    /// Creates an invalid definition error.
    pub fn invalid_definition(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an unknown item error.
    pub fn unknown_item(id: impl Into<String>) -> Self {
        Self::UnknownItem { id: id.into() }
    }
}
