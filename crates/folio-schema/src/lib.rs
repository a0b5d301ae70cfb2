//! # Folio Schema
//!
//! Schema field definitions and the state model of the array field editor.
//!
//! ## Overview
//!
//! - [`Field`] - A field definition, including array sub-schemas
//! - [`Condition`] - `if` / `requiredIf` conditions over sibling values
//! - [`ArrayEditor`] - Add, remove, reorder, validate, and reconcile array
//!   items
//!
//! ## Example
//!
//! ```
//! use folio_schema::{ArrayEditor, ArrayFailure, Field, FieldType};
//!
//! let field = Field::new("authors", FieldType::Array)
//!     .required()
//!     .with_schema(vec![Field::new("name", FieldType::String).unique()]);
//!
//! let mut editor = ArrayEditor::new(field, None);
//! assert_eq!(editor.validate_and_emit(), Some(&ArrayFailure::Required));
//! ```

#![doc(html_root_url = "https://docs.rs/folio-schema/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod array;
mod condition;
mod error;
mod field;

pub use array::{
    ArrayEditor, ArrayEditorRequest, ArrayFailure, ArrayItem, DisplayedError, EditorEvent,
    FieldState, ModalHost, SchemaInput, ServerError,
};
pub use condition::{Condition, ConditionalFields};
pub use error::SchemaError;
pub use field::{Choice, Field, FieldStyle, FieldType, Inline, InlineOptions};
