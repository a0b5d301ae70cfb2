//! Array item records.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use folio_core::new_id;

/// Per-field state of an item's nested form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    /// The field's value repeats another item's value in a unique field.
    pub duplicate: bool,
    /// Error reported by the nested form, if any.
    pub error: Option<String>,
}

/// The nested form bound to one item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaInput {
    /// Sub-schema values.
    pub data: Map<String, Value>,
    /// Whether any sub-field currently has an error.
    pub has_errors: bool,
    /// State of each sub-field that has been touched by validation.
    pub field_state: IndexMap<String, FieldState>,
}

impl SchemaInput {
    /// Returns the state of `field`, if any was recorded.
    #[must_use]
    pub fn state(&self, field: &str) -> Option<&FieldState> {
        self.field_state.get(field)
    }

    /// Returns true if `field` is flagged as a duplicate.
    #[must_use]
    pub fn is_duplicate(&self, field: &str) -> bool {
        self.state(field).is_some_and(|s| s.duplicate)
    }

    pub(crate) fn state_mut(&mut self, field: &str) -> &mut FieldState {
        self.field_state.entry(field.to_string()).or_default()
    }
}

/// One entry of an array field being edited.
///
/// Items are either collapsed or expanded (`open`). The id is unique within
/// the editor that owns the item.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayItem {
    /// Item id, stored as `_id`.
    pub id: String,
    /// Whether the item is expanded.
    pub open: bool,
    /// The item's nested form.
    pub schema_input: SchemaInput,
}

impl ArrayItem {
    /// Builds an item from a stored array entry, keeping its `_id` or
    /// assigning a fresh one.
    ///
    /// Entries that are not objects start with empty data.
    #[must_use]
    pub fn from_stored(stored: &Value, open: bool) -> Self {
        let data = stored.as_object().cloned().unwrap_or_default();
        let id = data
            .get("_id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map_or_else(new_id, str::to_string);
        Self {
            id,
            open,
            schema_input: SchemaInput {
                data,
                ..SchemaInput::default()
            },
        }
    }

    /// Creates a new item with a fresh id.
    #[must_use]
    pub fn new(data: Map<String, Value>, open: bool) -> Self {
        Self {
            id: new_id(),
            open,
            schema_input: SchemaInput {
                data,
                ..SchemaInput::default()
            },
        }
    }

    /// Returns the item's sub-schema values.
    #[must_use]
    pub fn data(&self) -> &Map<String, Value> {
        &self.schema_input.data
    }

    /// Whether the item's nested form has errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.schema_input.has_errors
    }
}
