//! Schema field definitions.
//!
//! A [`Field`] describes one property of a document: its type, label,
//! default, and the constraints form controls enforce. Array fields carry a
//! nested sub-schema describing each item.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::condition::Condition;
use crate::error::SchemaError;

/// The kind of value a field holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    /// Free text.
    String,
    /// URL slug.
    Slug,
    /// One of a fixed set of choices.
    Select,
    /// True or false.
    Boolean,
    /// Whole number.
    Integer,
    /// Decimal number.
    Float,
    /// Links to other documents, stored as an array of `{ "_id": ... }`.
    Relationship,
    /// Ordered list of sub-schema items.
    Array,
    /// Single nested sub-schema object.
    Object,
}

/// A choice offered by a select field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Stored value.
    pub value: String,
    /// Display label.
    pub label: String,
}

impl Choice {
    /// Creates a choice.
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Inline editing options for array fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineOptions {
    /// Keep every item expanded. When unset, items start expanded only if
    /// the sub-schema is small.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub always_expand: Option<bool>,
}

/// `inline` accepts either a flag or an options object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Inline {
    /// `inline: true` / `inline: false`.
    Flag(bool),
    /// `inline: { alwaysExpand: ... }`.
    Options(InlineOptions),
}

/// Presentation style for array fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldStyle {
    /// Items rendered as table rows with column headings.
    Table,
}

fn default_true() -> bool {
    true
}

/// A schema field definition.
///
/// # Example
///
/// ```
/// use folio_schema::{Field, FieldType};
///
/// let field = Field::new("links", FieldType::Array)
///     .with_label("Links")
///     .with_max(3)
///     .with_schema(vec![
///         Field::new("url", FieldType::String).unique(),
///         Field::new("label", FieldType::String),
///     ]);
///
/// assert_eq!(field.unique_subfield().map(|f| f.name.as_str()), Some("url"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Property name.
    pub name: String,

    /// Field type.
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Whether a value must be supplied.
    #[serde(default)]
    pub required: bool,

    /// Default value for new documents or items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub def: Option<Value>,

    /// Values must be distinct across the items of the enclosing array.
    #[serde(default)]
    pub unique: bool,

    /// Names of fields this field derives its value from. A leading `<`
    /// refers to a field of the parent document.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub following: Vec<String>,

    /// Select choices.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,

    /// Minimum number of array items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<usize>,

    /// Maximum number of array items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,

    /// Inline editing for arrays.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline: Option<Inline>,

    /// Whether array items can be reordered by dragging.
    #[serde(default = "default_true")]
    pub draggable: bool,

    /// Whether the field is displayed but not editable.
    #[serde(default)]
    pub read_only: bool,

    /// Sub-field whose value labels each array item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_field: Option<String>,

    /// Noun used for the "add" button of array fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_label: Option<String>,

    /// Array presentation style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<FieldStyle>,

    /// Sub-schema of array and object fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schema: Vec<Field>,

    /// Name under which array items are scoped when stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoped_array_name: Option<String>,

    /// Show the field only when the condition holds.
    #[serde(default, rename = "if", skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,

    /// Require the field only when the condition holds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_if: Option<Condition>,
}

impl Field {
    /// Creates a field with no constraints.
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            label: None,
            required: false,
            def: None,
            unique: false,
            following: Vec::new(),
            choices: Vec::new(),
            min: None,
            max: None,
            inline: None,
            draggable: true,
            read_only: false,
            title_field: None,
            item_label: None,
            style: None,
            schema: Vec::new(),
            scoped_array_name: None,
            condition: None,
            required_if: None,
        }
    }

    /// Sets the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Marks the field required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_def(mut self, def: Value) -> Self {
        self.def = Some(def);
        self
    }

    /// Marks the field unique within its array.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Adds a field this one follows.
    #[must_use]
    pub fn following(mut self, source: impl Into<String>) -> Self {
        self.following.push(source.into());
        self
    }

    /// Sets select choices.
    #[must_use]
    pub fn with_choices(mut self, choices: Vec<Choice>) -> Self {
        self.choices = choices;
        self
    }

    /// Sets the minimum item count.
    #[must_use]
    pub fn with_min(mut self, min: usize) -> Self {
        self.min = Some(min);
        self
    }

    /// Sets the maximum item count.
    #[must_use]
    pub fn with_max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    /// Enables inline editing, optionally forcing the expand policy.
    #[must_use]
    pub fn inline(mut self, always_expand: Option<bool>) -> Self {
        self.inline = Some(Inline::Options(InlineOptions { always_expand }));
        self
    }

    /// Disables drag reordering.
    #[must_use]
    pub fn not_draggable(mut self) -> Self {
        self.draggable = false;
        self
    }

    /// Marks the field read-only.
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Sets the sub-field used to label items.
    #[must_use]
    pub fn with_title_field(mut self, name: impl Into<String>) -> Self {
        self.title_field = Some(name.into());
        self
    }

    /// Sets the presentation style.
    #[must_use]
    pub fn with_style(mut self, style: FieldStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Sets the sub-schema.
    #[must_use]
    pub fn with_schema(mut self, schema: Vec<Field>) -> Self {
        self.schema = schema;
        self
    }

    /// Sets the scoped array name.
    #[must_use]
    pub fn with_scoped_array_name(mut self, name: impl Into<String>) -> Self {
        self.scoped_array_name = Some(name.into());
        self
    }

    /// Sets the visibility condition.
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Sets the conditional requirement.
    #[must_use]
    pub fn with_required_if(mut self, condition: Condition) -> Self {
        self.required_if = Some(condition);
        self
    }

    /// Returns the label, falling back to the name.
    #[must_use]
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// Returns the inline options if inline editing is on.
    #[must_use]
    pub fn inline_options(&self) -> Option<InlineOptions> {
        match self.inline {
            Some(Inline::Flag(true)) => Some(InlineOptions { always_expand: None }),
            Some(Inline::Options(options)) => Some(options),
            Some(Inline::Flag(false)) | None => None,
        }
    }

    /// Whether every item of this array field stays expanded.
    ///
    /// Non-inline arrays never expand inline. Inline arrays honour an
    /// explicit `always_expand`, and otherwise expand when the sub-schema
    /// has fewer than three fields.
    #[must_use]
    pub fn always_expand(&self) -> bool {
        match self.inline_options() {
            None => false,
            Some(InlineOptions {
                always_expand: Some(flag),
            }) => flag,
            Some(InlineOptions {
                always_expand: None,
            }) => self.schema.len() < 3,
        }
    }

    /// Returns the first sub-field marked unique.
    #[must_use]
    pub fn unique_subfield(&self) -> Option<&Field> {
        self.schema.iter().find(|f| f.unique)
    }

    /// Checks the definition for contradictions.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidDefinition`] when `min` exceeds `max`
    /// or an array field has no sub-schema.
    pub fn check(&self) -> Result<(), SchemaError> {
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(SchemaError::invalid_definition(
                    &self.name,
                    format!("min ({min}) is greater than max ({max})"),
                ));
            }
        }
        if self.field_type == FieldType::Array && self.schema.is_empty() {
            return Err(SchemaError::invalid_definition(
                &self.name,
                "array fields need a sub-schema",
            ));
        }
        self.schema.iter().try_for_each(Field::check)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sub(n: usize) -> Vec<Field> {
        (0..n)
            .map(|i| Field::new(format!("f{i}"), FieldType::String))
            .collect()
    }

    #[test]
    fn test_always_expand_not_inline() {
        let field = Field::new("items", FieldType::Array).with_schema(sub(1));
        assert!(!field.always_expand());
    }

    #[test]
    fn test_always_expand_small_inline_schema() {
        let field = Field::new("items", FieldType::Array)
            .inline(None)
            .with_schema(sub(2));
        assert!(field.always_expand());

        let field = field.with_schema(sub(3));
        assert!(!field.always_expand());
    }

    #[test]
    fn test_always_expand_explicit_override() {
        let field = Field::new("items", FieldType::Array)
            .inline(Some(false))
            .with_schema(sub(1));
        assert!(!field.always_expand());

        let field = Field::new("items", FieldType::Array)
            .inline(Some(true))
            .with_schema(sub(5));
        assert!(field.always_expand());
    }

    #[test]
    fn test_inline_accepts_flag_or_object() {
        let field: Field = serde_json::from_value(json!({
            "name": "items",
            "type": "array",
            "inline": true,
            "schema": [{ "name": "a", "type": "string" }]
        }))
        .unwrap();
        assert!(field.always_expand());

        let field: Field = serde_json::from_value(json!({
            "name": "items",
            "type": "array",
            "inline": { "alwaysExpand": false },
            "schema": [{ "name": "a", "type": "string" }]
        }))
        .unwrap();
        assert!(!field.always_expand());
        assert!(field.draggable);
    }

    #[test]
    fn test_check_min_greater_than_max() {
        let field = Field::new("items", FieldType::Array)
            .with_schema(sub(1))
            .with_min(3)
            .with_max(1);
        assert!(matches!(
            field.check(),
            Err(SchemaError::InvalidDefinition { .. })
        ));
    }

    #[test]
    fn test_check_array_needs_schema() {
        let field = Field::new("items", FieldType::Array);
        assert!(field.check().is_err());
        assert!(Field::new("title", FieldType::String).check().is_ok());
    }

    #[test]
    fn test_display_label_falls_back_to_name() {
        assert_eq!(Field::new("url", FieldType::String).display_label(), "url");
        assert_eq!(
            Field::new("url", FieldType::String)
                .with_label("URL")
                .display_label(),
            "URL"
        );
    }
}
