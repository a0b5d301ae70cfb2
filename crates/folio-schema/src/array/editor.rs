//! The array field editor.
//!
//! [`ArrayEditor`] owns the item records of one array field while it is
//! being edited. Every mutating operation ends with [`ArrayEditor::reconcile`],
//! which either forces erroneous items open or recomputes the flat value the
//! host form stores.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use folio_core::{new_id, FolioResult};
use folio_telemetry::metrics::record_array_validation_failure;

use super::item::ArrayItem;
use super::modal::{ArrayEditorRequest, ModalHost, ServerError, ARRAY_EDITOR_COMPONENT};
use super::validate::{duplicate_keys, unique_key, ArrayFailure};
use crate::condition::ConditionalFields;
use crate::error::SchemaError;
use crate::field::{Field, FieldStyle};

/// Notifications queued for the host form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    /// The editor validated its value; the host should re-read the error.
    Validate,
    /// The flat value changed.
    Changed,
}

/// The error the control displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayedError<'a> {
    /// Raised by the editor's own validation.
    Local(&'a ArrayFailure),
    /// Reported by the server.
    Server(&'a ServerError),
}

impl DisplayedError<'_> {
    /// Returns the error code.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Local(failure) => failure.code(),
            Self::Server(error) => &error.name,
        }
    }
}

/// Editing state of one array field.
///
/// # Example
///
/// ```
/// use folio_schema::{ArrayEditor, ArrayFailure, Field, FieldType};
/// use serde_json::json;
///
/// let field = Field::new("links", FieldType::Array)
///     .with_max(1)
///     .with_schema(vec![Field::new("url", FieldType::String).with_def(json!(""))]);
///
/// let mut editor = ArrayEditor::new(field, None);
/// editor.add();
/// editor.add();
///
/// assert_eq!(editor.next().len(), 2);
/// assert_eq!(editor.validate_and_emit(), Some(&ArrayFailure::Max));
/// ```
#[derive(Debug, Clone)]
pub struct ArrayEditor {
    field: Field,
    items: Vec<ArrayItem>,
    next: Vec<Map<String, Value>>,
    conditional_fields: IndexMap<String, ConditionalFields>,
    error: Option<ArrayFailure>,
    server_error: Option<ServerError>,
    doc_id: Option<String>,
    parent_following_values: Map<String, Value>,
    trigger_validation: bool,
    generation: u64,
    events: Vec<EditorEvent>,
}

impl ArrayEditor {
    /// Creates an editor over `stored`, falling back to the field's default
    /// and then to an empty array.
    ///
    /// Items without an `_id` receive a fresh one, and the flat value is
    /// projected immediately so it carries those ids.
    #[must_use]
    pub fn new(field: Field, stored: Option<&[Value]>) -> Self {
        let mut editor = Self {
            field,
            items: Vec::new(),
            next: Vec::new(),
            conditional_fields: IndexMap::new(),
            error: None,
            server_error: None,
            doc_id: None,
            parent_following_values: Map::new(),
            trigger_validation: false,
            generation: 0,
            events: Vec::new(),
        };
        editor.rebuild(stored);
        editor.next = editor.project();
        editor
    }

    /// Sets the server error for the field.
    #[must_use]
    pub fn with_server_error(mut self, error: ServerError) -> Self {
        self.server_error = Some(error);
        self
    }

    /// Sets the id of the document being edited.
    #[must_use]
    pub fn with_doc_id(mut self, doc_id: impl Into<String>) -> Self {
        self.doc_id = Some(doc_id.into());
        self
    }

    /// Sets the parent document values that sub-fields may follow.
    #[must_use]
    pub fn with_parent_following_values(mut self, values: Map<String, Value>) -> Self {
        self.parent_following_values = values;
        self
    }

    /// Returns the field being edited.
    #[must_use]
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// Returns the item records in display order.
    #[must_use]
    pub fn items(&self) -> &[ArrayItem] {
        &self.items
    }

    /// Returns the item with `id`.
    #[must_use]
    pub fn item(&self, id: &str) -> Option<&ArrayItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Returns the flat value last computed by reconciliation.
    #[must_use]
    pub fn next(&self) -> &[Map<String, Value>] {
        &self.next
    }

    /// Returns the current validation failure.
    #[must_use]
    pub fn error(&self) -> Option<&ArrayFailure> {
        self.error.as_ref()
    }

    /// Returns how many times the stored value was re-read.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the evaluated conditions of every item, keyed by item id.
    #[must_use]
    pub fn conditional_fields(&self) -> &IndexMap<String, ConditionalFields> {
        &self.conditional_fields
    }

    /// Whether every item stays expanded.
    #[must_use]
    pub fn always_expand(&self) -> bool {
        self.field.always_expand()
    }

    /// Re-reads the stored value and rebuilds every item.
    pub fn regenerate(&mut self, stored: Option<&[Value]>) {
        self.generation += 1;
        self.rebuild(stored);
        debug!(
            field = %self.field.name,
            generation = self.generation,
            items = self.items.len(),
            "array editor regenerated"
        );
        self.reconcile();
    }

    /// Appends an item built from sub-schema defaults, opens it, and
    /// collapses the others unless every item stays expanded.
    ///
    /// Returns the new item's id.
    pub fn add(&mut self) -> String {
        let item = ArrayItem::new(self.new_instance(), self.always_expand());
        let id = item.id.clone();
        self.items.push(item);
        self.refresh_conditions(&id);
        self.open_only(&id);
        debug!(field = %self.field.name, item_id = %id, "array item added");
        self.reconcile();
        id
    }

    /// Removes the item with `id` and its cached conditions.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownItem`] if no item has that id.
    pub fn remove(&mut self, id: &str) -> Result<ArrayItem, SchemaError> {
        let index = self.position(id)?;
        let item = self.items.remove(index);
        self.conditional_fields.shift_remove(id);
        debug!(field = %self.field.name, item_id = %id, "array item removed");
        self.reconcile();
        Ok(item)
    }

    /// Moves the item at `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::IndexOutOfRange`] if either index is past the
    /// end of the list.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<(), SchemaError> {
        let len = self.items.len();
        for index in [from, to] {
            if index >= len {
                return Err(SchemaError::IndexOutOfRange { index, len });
            }
        }
        let item = self.items.remove(from);
        self.items.insert(to, item);
        trace!(field = %self.field.name, from, to, "array item moved");
        self.reconcile();
        Ok(())
    }

    /// Opens the item with `id`, collapsing the others unless every item
    /// stays expanded.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownItem`] if no item has that id.
    pub fn open_inline_item(&mut self, id: &str) -> Result<(), SchemaError> {
        self.position(id)?;
        self.open_only(id);
        Ok(())
    }

    /// Collapses every item unless every item stays expanded.
    pub fn close_inline_item(&mut self) {
        let open = self.always_expand();
        for item in &mut self.items {
            item.open = open;
        }
    }

    /// Flips the open state of one item.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownItem`] if no item has that id.
    pub fn toggle(&mut self, id: &str) -> Result<bool, SchemaError> {
        let index = self.position(id)?;
        let item = &mut self.items[index];
        item.open = !item.open;
        Ok(item.open)
    }

    /// Sets one sub-field value of an item.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownItem`] if no item has that id.
    pub fn set_item_value(
        &mut self,
        id: &str,
        field: impl Into<String>,
        value: Value,
    ) -> Result<(), SchemaError> {
        let index = self.position(id)?;
        self.items[index]
            .schema_input
            .data
            .insert(field.into(), value);
        self.refresh_conditions(id);
        self.reconcile();
        Ok(())
    }

    /// Replaces all sub-field values of an item.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownItem`] if no item has that id.
    pub fn update_item(&mut self, id: &str, data: Map<String, Value>) -> Result<(), SchemaError> {
        let index = self.position(id)?;
        self.items[index].schema_input.data = data;
        self.refresh_conditions(id);
        self.reconcile();
        Ok(())
    }

    /// Records the errors an item's nested form reported. An empty list
    /// clears them.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownItem`] if no item has that id.
    pub fn report_item_errors<I, K, M>(&mut self, id: &str, errors: I) -> Result<(), SchemaError>
    where
        I: IntoIterator<Item = (K, M)>,
        K: Into<String>,
        M: Into<String>,
    {
        let index = self.position(id)?;
        let input = &mut self.items[index].schema_input;
        for state in input.field_state.values_mut() {
            state.error = None;
        }
        let mut has_errors = false;
        for (field, message) in errors {
            let field = field.into();
            input.state_mut(&field).error = Some(message.into());
            has_errors = true;
        }
        input.has_errors = has_errors;
        self.reconcile();
        Ok(())
    }

    /// Brings the flat value in line with the items.
    ///
    /// Items with errors are forced open and the flat value is left alone
    /// until they are fixed. Otherwise each item is projected as its data
    /// plus `_id`, `metaType`, and `scopedArrayName`. When validation has
    /// been triggered, it runs again.
    pub fn reconcile(&mut self) {
        let mut erroneous = 0usize;
        for item in self.items.iter_mut().filter(|item| item.has_errors()) {
            erroneous += 1;
            if !item.open {
                item.open = true;
                trace!(item_id = %item.id, "opened item with errors");
            }
        }
        if erroneous == 0 {
            self.next = self.project();
            self.queue(EditorEvent::Changed);
        } else {
            debug!(
                field = %self.field.name,
                erroneous,
                "array value not recomputed while items have errors"
            );
        }
        if self.trigger_validation {
            self.validate_and_emit();
        }
    }

    /// Validates `value` against the field's constraints.
    ///
    /// Duplicate flags on every item are cleared first, then set on each
    /// item whose unique sub-field repeats another item's value.
    pub fn validate(&mut self, value: &[Map<String, Value>]) -> Option<ArrayFailure> {
        self.clear_duplicate_flags();

        if self.items.iter().any(ArrayItem::has_errors) {
            return Some(ArrayFailure::Invalid);
        }
        if self.field.required && value.is_empty() {
            return Some(ArrayFailure::Required);
        }
        if let Some(min) = self.field.min.filter(|min| *min > 0) {
            if value.len() < min {
                return Some(ArrayFailure::Min);
            }
        }
        if let Some(max) = self.field.max.filter(|max| *max > 0) {
            if value.len() > max {
                return Some(ArrayFailure::Max);
            }
        }
        if value.is_empty() {
            return None;
        }

        let (name, label) = {
            let unique = self.field.unique_subfield()?;
            (unique.name.clone(), unique.display_label().to_string())
        };
        let duplicates = duplicate_keys(value, &name);
        if duplicates.is_empty() {
            return None;
        }
        for item in &mut self.items {
            let flagged = unique_key(item.schema_input.data.get(&name))
                .is_some_and(|key| duplicates.contains(&key));
            item.schema_input.state_mut(&name).duplicate = flagged;
        }
        Some(ArrayFailure::duplicate(&name, &label))
    }

    /// Validates the flat value, stores the outcome, and queues
    /// [`EditorEvent::Validate`].
    pub fn validate_and_emit(&mut self) -> Option<&ArrayFailure> {
        let next = std::mem::take(&mut self.next);
        let failure = self.validate(&next);
        self.next = next;

        if let Some(failure) = &failure {
            record_array_validation_failure(failure.code());
            debug!(field = %self.field.name, code = failure.code(), "array validation failed");
        }
        self.error = failure;
        self.queue(EditorEvent::Validate);
        self.error.as_ref()
    }

    /// Validates now and again after every later reconciliation.
    pub fn trigger_validation(&mut self) -> Option<&ArrayFailure> {
        self.trigger_validation = true;
        self.validate_and_emit()
    }

    /// Takes the queued events.
    ///
    /// Each kind of event is queued at most once between drains, in the
    /// order it first occurred.
    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    fn queue(&mut self, event: EditorEvent) {
        if !self.events.contains(&event) {
            self.events.push(event);
        }
    }

    /// Opens the full-screen editor over the whole list.
    ///
    /// On confirm the items are replaced by the modal's result and `true` is
    /// returned. On cancel nothing changes.
    ///
    /// # Errors
    ///
    /// Returns whatever error the modal host reports; the editor is left
    /// untouched.
    pub async fn edit_via_modal<H>(&mut self, host: &H) -> FolioResult<bool>
    where
        H: ModalHost + ?Sized,
    {
        let request = ArrayEditorRequest {
            field: self.field.clone(),
            input_schema: self.field.schema.clone(),
            items: self.next.clone(),
            server_error: self.server_error.clone(),
            doc_id: self.doc_id.clone(),
            parent_following_values: self.parent_following_values.clone(),
        };

        let Some(result) = host.execute(ARRAY_EDITOR_COMPONENT, request).await? else {
            debug!(field = %self.field.name, "array modal cancelled");
            return Ok(false);
        };

        let stored: Vec<Value> = result.into_iter().map(Value::Object).collect();
        self.rebuild(Some(&stored));
        debug!(field = %self.field.name, items = self.items.len(), "array replaced from modal");
        self.reconcile();
        Ok(true)
    }

    /// Whether the add button is disabled because `max` was reached.
    #[must_use]
    pub fn disable_add(&self) -> bool {
        self.field
            .max
            .is_some_and(|max| max > 0 && self.items.len() >= max)
    }

    /// Whether items can be reordered by dragging.
    #[must_use]
    pub fn can_drag(&self) -> bool {
        self.field.draggable && !self.field.read_only && self.next.len() > 1
    }

    /// Returns the label of an item: its title field value, or `Item <n>`
    /// counting from one.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownItem`] if no item has that id.
    pub fn label(&self, id: &str, index: usize) -> Result<String, SchemaError> {
        let item = self.item(id).ok_or_else(|| SchemaError::unknown_item(id))?;
        let title = self
            .field
            .title_field
            .as_deref()
            .and_then(|path| lookup_path(item.data(), path))
            .and_then(display_value);
        Ok(title.unwrap_or_else(|| format!("Item {}", index + 1)))
    }

    /// Returns the error to display, hiding `invalid` because the item
    /// fields show their own errors.
    #[must_use]
    pub fn effective_error(&self) -> Option<DisplayedError<'_>> {
        let shown = match (&self.error, &self.server_error) {
            (Some(failure), _) => DisplayedError::Local(failure),
            (None, Some(error)) => DisplayedError::Server(error),
            (None, None) => return None,
        };
        (shown.name() != "invalid").then_some(shown)
    }

    /// Returns the sub-fields shown as columns.
    ///
    /// Only table-style arrays filter: a column is hidden when its `if`
    /// condition fails for the open item, or the last item if none is open.
    #[must_use]
    pub fn visible_schema(&self) -> Vec<&Field> {
        if self.field.style != Some(FieldStyle::Table) {
            return self.field.schema.iter().collect();
        }
        let current = self
            .items
            .iter()
            .find(|item| item.open)
            .or_else(|| self.items.last());
        let conditions = current.and_then(|item| self.conditional_fields.get(&item.id));
        self.field
            .schema
            .iter()
            .filter(|field| conditions.map_or(true, |c| c.is_visible(&field.name)))
            .collect()
    }

    /// Returns, for each sub-field that follows others, the values it
    /// follows. Sources starting with `<` read the parent document.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownItem`] if no item has that id.
    pub fn following_values(&self, id: &str) -> Result<Map<String, Value>, SchemaError> {
        let item = self.item(id).ok_or_else(|| SchemaError::unknown_item(id))?;
        let values = self
            .field
            .schema
            .iter()
            .filter(|field| !field.following.is_empty())
            .map(|field| {
                let sources = field
                    .following
                    .iter()
                    .map(|source| {
                        let value = match source.strip_prefix('<') {
                            Some(parent) => self.parent_following_values.get(parent),
                            None => item.data().get(source),
                        };
                        (source.clone(), value.cloned().unwrap_or(Value::Null))
                    })
                    .collect();
                (field.name.clone(), Value::Object(sources))
            })
            .collect();
        Ok(values)
    }

    fn position(&self, id: &str) -> Result<usize, SchemaError> {
        self.items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| SchemaError::unknown_item(id))
    }

    fn open_only(&mut self, id: &str) {
        let always = self.always_expand();
        for item in &mut self.items {
            item.open = item.id == id || always;
        }
    }

    fn new_instance(&self) -> Map<String, Value> {
        self.field
            .schema
            .iter()
            .filter_map(|field| field.def.clone().map(|def| (field.name.clone(), def)))
            .collect()
    }

    fn rebuild(&mut self, stored: Option<&[Value]>) {
        let stored = stored.map(<[Value]>::to_vec).unwrap_or_else(|| {
            self.field
                .def
                .as_ref()
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default()
        });
        let open = self.always_expand();
        let mut seen = HashSet::with_capacity(stored.len());
        self.items = stored
            .iter()
            .map(|entry| {
                let mut item = ArrayItem::from_stored(entry, open);
                if !seen.insert(item.id.clone()) {
                    let fresh = new_id();
                    debug!(
                        field = %self.field.name,
                        repeated = %item.id,
                        item_id = %fresh,
                        "repeated array item id replaced"
                    );
                    item.schema_input
                        .data
                        .insert("_id".to_string(), Value::String(fresh.clone()));
                    item.id = fresh;
                    seen.insert(item.id.clone());
                }
                item
            })
            .collect();
        self.conditional_fields = self
            .items
            .iter()
            .map(|item| {
                let conditions = ConditionalFields::evaluate(&self.field.schema, item.data());
                (item.id.clone(), conditions)
            })
            .collect();
    }

    fn refresh_conditions(&mut self, id: &str) {
        if let Some(item) = self.items.iter().find(|item| item.id == id) {
            let conditions = ConditionalFields::evaluate(&self.field.schema, item.data());
            self.conditional_fields.insert(id.to_string(), conditions);
        }
    }

    fn clear_duplicate_flags(&mut self) {
        for item in &mut self.items {
            for state in item.schema_input.field_state.values_mut() {
                state.duplicate = false;
            }
        }
    }

    fn project(&self) -> Vec<Map<String, Value>> {
        self.items
            .iter()
            .map(|item| {
                let mut row = item.schema_input.data.clone();
                row.insert("_id".to_string(), Value::String(item.id.clone()));
                row.insert(
                    "metaType".to_string(),
                    Value::String("arrayItem".to_string()),
                );
                match &self.field.scoped_array_name {
                    Some(name) => {
                        row.insert("scopedArrayName".to_string(), Value::String(name.clone()));
                    }
                    None => {
                        row.remove("scopedArrayName");
                    }
                }
                row
            })
            .collect()
    }
}

fn lookup_path<'a>(data: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = data.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            Value::Array(entries) => entries.get(segment.parse::<usize>().ok()?)?,
            other => other.get(segment)?,
        };
    }
    Some(current)
}

fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Condition;
    use crate::field::FieldType;
    use serde_json::json;

    fn links() -> Field {
        Field::new("links", FieldType::Array).with_schema(vec![
            Field::new("url", FieldType::String)
                .unique()
                .with_label("URL")
                .with_def(json!("")),
            Field::new("label", FieldType::String).with_def(json!("Read more")),
            Field::new("tags", FieldType::Relationship),
        ])
    }

    fn stored(values: Value) -> Vec<Value> {
        values.as_array().cloned().unwrap_or_default()
    }

    #[test]
    fn test_new_from_stored_assigns_ids() {
        let stored = stored(json!([{ "_id": "a", "url": "x" }, { "url": "y" }]));
        let editor = ArrayEditor::new(links(), Some(&stored));
        assert_eq!(editor.items().len(), 2);
        assert_eq!(editor.items()[0].id, "a");
        assert!(!editor.items()[1].id.is_empty());
        assert_eq!(editor.next()[1]["_id"], json!(editor.items()[1].id));
        assert_eq!(editor.conditional_fields().len(), 2);
    }

    #[test]
    fn test_repeated_stored_ids_are_made_unique() {
        let stored = stored(json!([{ "_id": "a", "url": "x" }, { "_id": "a", "url": "y" }]));
        let mut editor = ArrayEditor::new(links(), Some(&stored));

        let first = editor.items()[0].id.clone();
        let second = editor.items()[1].id.clone();
        assert_eq!(first, "a");
        assert_ne!(first, second);
        assert_eq!(editor.next()[1]["_id"], json!(second));
        assert_eq!(editor.conditional_fields().len(), 2);

        editor.remove("a").unwrap();
        assert_eq!(editor.items().len(), 1);
        assert_eq!(editor.items()[0].data()["url"], json!("y"));
        assert!(editor.conditional_fields().contains_key(&second));
        assert_eq!(editor.conditional_fields().len(), 1);
    }

    #[test]
    fn test_new_falls_back_to_field_default() {
        let field = links().with_def(json!([{ "url": "d" }]));
        let editor = ArrayEditor::new(field, None);
        assert_eq!(editor.items().len(), 1);
        assert_eq!(editor.next()[0]["url"], "d");

        let editor = ArrayEditor::new(links(), None);
        assert!(editor.items().is_empty());
    }

    #[test]
    fn test_add_uses_defaults_and_unique_ids() {
        let mut editor = ArrayEditor::new(links(), None);
        let ids: Vec<String> = (0..5).map(|_| editor.add()).collect();

        assert_eq!(editor.next().len(), 5);
        for (row, id) in editor.next().iter().zip(&ids) {
            assert_eq!(row["_id"], json!(id));
            assert_eq!(row["label"], "Read more");
            assert_eq!(row["url"], "");
            assert_eq!(row["metaType"], "arrayItem");
            assert!(row.get("tags").is_none());
        }
        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 5);
    }

    #[test]
    fn test_add_collapses_others_unless_always_expand() {
        let mut editor = ArrayEditor::new(links().inline(Some(false)), None);
        let first = editor.add();
        let second = editor.add();
        assert!(!editor.item(&first).unwrap().open);
        assert!(editor.item(&second).unwrap().open);

        let mut editor = ArrayEditor::new(links().inline(Some(true)), None);
        let first = editor.add();
        editor.add();
        assert!(editor.item(&first).unwrap().open);
    }

    #[test]
    fn test_add_defaults_are_copies() {
        let field = Field::new("rows", FieldType::Array).with_schema(vec![Field::new(
            "cells",
            FieldType::Array,
        )
        .with_def(json!([]))]);
        let mut editor = ArrayEditor::new(field, None);
        let a = editor.add();
        let b = editor.add();
        editor.set_item_value(&a, "cells", json!([1])).unwrap();
        assert_eq!(editor.item(&b).unwrap().data()["cells"], json!([]));
    }

    #[test]
    fn test_remove_drops_item_and_conditions() {
        let mut editor = ArrayEditor::new(links(), None);
        let a = editor.add();
        let b = editor.add();
        editor.remove(&a).unwrap();

        assert_eq!(editor.items().len(), 1);
        assert_eq!(editor.conditional_fields().len(), 1);
        assert!(editor.conditional_fields().contains_key(&b));
        assert!(matches!(
            editor.remove(&a),
            Err(SchemaError::UnknownItem { .. })
        ));
    }

    #[test]
    fn test_move_item() {
        let mut editor = ArrayEditor::new(links(), None);
        let a = editor.add();
        let b = editor.add();
        let c = editor.add();
        editor.move_item(0, 2).unwrap();

        let order: Vec<&str> = editor.next().iter().map(|r| r["_id"].as_str().unwrap()).collect();
        assert_eq!(order, vec![b.as_str(), c.as_str(), a.as_str()]);
        assert!(editor.move_item(0, 3).is_err());
    }

    #[test]
    fn test_validate_priority() {
        let field = links().required().with_min(2).with_max(3);
        let mut editor = ArrayEditor::new(field, None);
        assert_eq!(editor.validate_and_emit(), Some(&ArrayFailure::Required));

        let id = editor.add();
        assert_eq!(editor.validate_and_emit(), Some(&ArrayFailure::Min));

        editor.report_item_errors(&id, [("url", "required")]).unwrap();
        assert_eq!(editor.validate_and_emit(), Some(&ArrayFailure::Invalid));
        assert!(editor.effective_error().is_none());
    }

    #[test]
    fn test_validate_required_empty() {
        let mut editor = ArrayEditor::new(links().required(), None);
        assert_eq!(editor.validate(&[]), Some(ArrayFailure::Required));
    }

    #[test]
    fn test_validate_max_after_three_adds() {
        let mut editor = ArrayEditor::new(links().with_max(2), None);
        let values = ["a", "b", "c"];
        for value in values {
            let id = editor.add();
            editor.set_item_value(&id, "url", json!(value)).unwrap();
        }
        assert_eq!(editor.validate_and_emit(), Some(&ArrayFailure::Max));
        assert!(editor.disable_add());
    }

    #[test]
    fn test_duplicates_flag_every_sharing_item() {
        let mut editor = ArrayEditor::new(links(), None);
        let a = editor.add();
        let b = editor.add();
        let c = editor.add();
        editor.set_item_value(&a, "url", json!("/x")).unwrap();
        editor.set_item_value(&b, "url", json!("/y")).unwrap();
        editor.set_item_value(&c, "url", json!("/x")).unwrap();

        let failure = editor.validate_and_emit().cloned();
        assert!(matches!(
            failure,
            Some(ArrayFailure::Duplicate { ref field, ref message })
                if field == "url" && message.contains("URL")
        ));
        assert!(editor.item(&a).unwrap().schema_input.is_duplicate("url"));
        assert!(!editor.item(&b).unwrap().schema_input.is_duplicate("url"));
        assert!(editor.item(&c).unwrap().schema_input.is_duplicate("url"));

        editor.set_item_value(&c, "url", json!("/z")).unwrap();
        assert_eq!(editor.validate_and_emit(), None);
        assert!(!editor.item(&a).unwrap().schema_input.is_duplicate("url"));
    }

    #[test]
    fn test_relationship_duplicates_compare_sorted_ids() {
        let field = Field::new("picks", FieldType::Array).with_schema(vec![
            Field::new("poets", FieldType::Relationship).unique(),
        ]);
        let stored = stored(json!([
            { "poets": [{ "_id": "p2" }, { "_id": "p1" }] },
            { "poets": [{ "_id": "p1" }, { "_id": "p2" }] },
            { "poets": [] },
            { "poets": [] }
        ]));
        let mut editor = ArrayEditor::new(field, Some(&stored));
        assert_eq!(editor.validate_and_emit().map(ArrayFailure::code), Some("duplicate"));
        let flags: Vec<bool> = editor
            .items()
            .iter()
            .map(|item| item.schema_input.is_duplicate("poets"))
            .collect();
        assert_eq!(flags, vec![true, true, false, false]);
    }

    #[test]
    fn test_reconcile_forces_errored_items_open() {
        let mut editor = ArrayEditor::new(links().inline(Some(false)), None);
        let a = editor.add();
        let b = editor.add();
        assert!(!editor.item(&a).unwrap().open);

        let before = editor.next().to_vec();
        editor.report_item_errors(&a, [("url", "required")]).unwrap();
        assert!(editor.item(&a).unwrap().open);

        editor.set_item_value(&b, "label", json!("changed")).unwrap();
        assert_eq!(editor.next(), before.as_slice());

        editor.report_item_errors(&a, Vec::<(String, String)>::new()).unwrap();
        assert_eq!(editor.next()[1]["label"], "changed");
    }

    #[test]
    fn test_scoped_array_name_projection() {
        let stored = stored(json!([{ "scopedArrayName": "old" }]));
        let editor = ArrayEditor::new(links().with_scoped_array_name("page.links"), Some(&stored));
        assert_eq!(editor.next()[0]["scopedArrayName"], "page.links");

        let editor = ArrayEditor::new(links(), Some(&stored));
        assert!(editor.next()[0].get("scopedArrayName").is_none());
    }

    #[test]
    fn test_trigger_validation_reruns_after_reconcile() {
        let mut editor = ArrayEditor::new(links().with_max(1), None);
        editor.add();
        assert_eq!(editor.trigger_validation(), None);
        editor.drain_events();

        editor.add();
        assert_eq!(editor.error(), Some(&ArrayFailure::Max));
        assert_eq!(
            editor.drain_events(),
            vec![EditorEvent::Changed, EditorEvent::Validate]
        );
    }

    #[test]
    fn test_events_coalesce_until_drained() {
        let mut editor = ArrayEditor::new(links(), None);
        editor.trigger_validation();
        assert_eq!(editor.drain_events(), vec![EditorEvent::Validate]);

        for _ in 0..50 {
            editor.add();
        }
        assert_eq!(
            editor.drain_events(),
            vec![EditorEvent::Changed, EditorEvent::Validate]
        );

        editor.add();
        assert_eq!(
            editor.drain_events(),
            vec![EditorEvent::Changed, EditorEvent::Validate]
        );
        assert!(editor.drain_events().is_empty());
    }

    #[test]
    fn test_open_close_toggle() {
        let mut editor = ArrayEditor::new(links().inline(Some(false)), None);
        let a = editor.add();
        let b = editor.add();
        editor.open_inline_item(&a).unwrap();
        assert!(editor.item(&a).unwrap().open);
        assert!(!editor.item(&b).unwrap().open);

        assert_eq!(editor.toggle(&b), Ok(true));
        editor.close_inline_item();
        assert!(editor.items().iter().all(|item| !item.open));
        assert!(editor.open_inline_item("missing").is_err());
    }

    #[test]
    fn test_label() {
        let mut editor = ArrayEditor::new(links().with_title_field("url"), None);
        let id = editor.add();
        assert_eq!(editor.label(&id, 0).unwrap(), "Item 1");
        editor.set_item_value(&id, "url", json!("/poets")).unwrap();
        assert_eq!(editor.label(&id, 0).unwrap(), "/poets");
        assert!(editor.label("missing", 0).is_err());
    }

    #[test]
    fn test_label_nested_path() {
        let stored = stored(json!([{ "meta": { "name": "Chaucer" } }]));
        let editor = ArrayEditor::new(links().with_title_field("meta.name"), Some(&stored));
        let id = editor.items()[0].id.clone();
        assert_eq!(editor.label(&id, 4).unwrap(), "Chaucer");
    }

    #[test]
    fn test_can_drag() {
        let mut editor = ArrayEditor::new(links(), None);
        editor.add();
        assert!(!editor.can_drag());
        editor.add();
        assert!(editor.can_drag());

        let mut editor = ArrayEditor::new(links().read_only(), None);
        editor.add();
        editor.add();
        assert!(!editor.can_drag());

        let mut editor = ArrayEditor::new(links().not_draggable(), None);
        editor.add();
        editor.add();
        assert!(!editor.can_drag());
    }

    #[test]
    fn test_effective_error_prefers_local() {
        let mut editor = ArrayEditor::new(links().required(), None)
            .with_server_error(ServerError::new("invalid"));
        assert!(editor.effective_error().is_none());

        editor.validate_and_emit();
        assert_eq!(editor.effective_error().map(|e| e.name().to_string()), Some("required".to_string()));

        let editor = ArrayEditor::new(links(), None).with_server_error(ServerError::new("min"));
        assert!(matches!(editor.effective_error(), Some(DisplayedError::Server(_))));
    }

    #[test]
    fn test_visible_schema_table_style() {
        let field = Field::new("rows", FieldType::Array)
            .with_style(FieldStyle::Table)
            .inline(Some(false))
            .with_schema(vec![
                Field::new("kind", FieldType::Select),
                Field::new("meter", FieldType::String)
                    .with_condition(Condition::new().eq("kind", json!("poem"))),
            ]);
        let mut editor = ArrayEditor::new(field.clone(), None);
        assert_eq!(editor.visible_schema().len(), 2);

        let a = editor.add();
        editor.set_item_value(&a, "kind", json!("essay")).unwrap();
        assert_eq!(editor.visible_schema().len(), 1);

        editor.set_item_value(&a, "kind", json!("poem")).unwrap();
        assert_eq!(editor.visible_schema().len(), 2);

        let mut list_field = field;
        list_field.style = None;
        let stored = stored(json!([{ "kind": "essay" }]));
        let list = ArrayEditor::new(list_field, Some(&stored));
        assert_eq!(list.visible_schema().len(), 2);
    }

    #[test]
    fn test_following_values() {
        let field = Field::new("links", FieldType::Array).with_schema(vec![
            Field::new("label", FieldType::String),
            Field::new("slug", FieldType::Slug)
                .following("label")
                .following("<title"),
        ]);
        let mut parent = Map::new();
        parent.insert("title".to_string(), json!("Poets"));
        let mut editor = ArrayEditor::new(field, None).with_parent_following_values(parent);
        let id = editor.add();
        editor.set_item_value(&id, "label", json!("Chaucer")).unwrap();

        let values = editor.following_values(&id).unwrap();
        assert_eq!(values["slug"], json!({ "label": "Chaucer", "<title": "Poets" }));
        assert!(values.get("label").is_none());
    }

    #[test]
    fn test_regenerate_rebuilds_items() {
        let mut editor = ArrayEditor::new(links(), None);
        editor.add();
        let stored = stored(json!([{ "_id": "x" }, { "_id": "y" }]));
        editor.regenerate(Some(&stored));
        assert_eq!(editor.generation(), 1);
        assert_eq!(editor.items().len(), 2);
        assert_eq!(editor.next()[0]["_id"], "x");
    }
}
