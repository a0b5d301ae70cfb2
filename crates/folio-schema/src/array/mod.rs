//! Array field editing.
//!
//! - [`ArrayEditor`] - Item records, reconciliation, and validation
//! - [`ArrayItem`] - One item and its nested form state
//! - [`ArrayFailure`] - Validation failure codes
//! - [`ModalHost`] - Collaborator that opens the full-screen editor

mod editor;
mod item;
mod modal;
mod validate;

pub use editor::{ArrayEditor, DisplayedError, EditorEvent};
pub use item::{ArrayItem, FieldState, SchemaInput};
pub use modal::{ArrayEditorRequest, ModalHost, ServerError, ARRAY_EDITOR_COMPONENT};
pub use validate::ArrayFailure;
