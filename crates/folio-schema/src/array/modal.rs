//! The modal editor contract.
//!
//! Editing an array through the full-screen editor is delegated to a
//! [`ModalHost`]. The host receives an [`ArrayEditorRequest`] and resolves
//! to the updated items, or `None` when the user cancels.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use folio_core::{BoxFuture, FolioResult};

use crate::field::Field;

/// Component name the array editor asks the modal host to open.
pub const ARRAY_EDITOR_COMPONENT: &str = "ArrayEditor";

/// An error reported by the server for the array field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerError {
    /// Error code, e.g. `invalid` or `duplicate`.
    pub name: String,
    /// Human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ServerError {
    /// Creates a server error with no message.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: None,
        }
    }

    /// Sets the message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// What the modal editor is opened with.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayEditorRequest {
    /// The array field definition.
    pub field: Field,
    /// The item sub-schema.
    pub input_schema: Vec<Field>,
    /// Current flat items.
    pub items: Vec<Map<String, Value>>,
    /// Server error for the field, if any.
    pub server_error: Option<ServerError>,
    /// Id of the document being edited.
    pub doc_id: Option<String>,
    /// Values of parent fields that sub-fields follow.
    pub parent_following_values: Map<String, Value>,
}

/// Opens modal editors on behalf of form controls.
pub trait ModalHost: Send + Sync {
    /// Opens `component` and resolves once the user confirms or cancels.
    ///
    /// # Errors
    ///
    /// Returns an error if the modal could not be opened.
    fn execute<'a>(
        &'a self,
        component: &'a str,
        request: ArrayEditorRequest,
    ) -> BoxFuture<'a, FolioResult<Option<Vec<Map<String, Value>>>>>;
}
