//! Conditional fields.
//!
//! A field may declare an `if` condition (shown only when it holds) and a
//! `requiredIf` condition (required only when it holds). Conditions are
//! objects mapping sibling field names to expected values, combinable with
//! `$or` and `$and`:
//!
//! ```json
//! { "kind": "poem", "$or": [{ "lang": "en" }, { "lang": "fr" }] }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::field::Field;

/// A declarative condition over an item's data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Condition(Map<String, Value>);

impl Condition {
    /// Creates an empty condition, which always holds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires `field` to equal `expected`.
    #[must_use]
    pub fn eq(mut self, field: impl Into<String>, expected: Value) -> Self {
        self.0.insert(field.into(), expected);
        self
    }

    /// Requires at least one of `alternatives` to hold.
    #[must_use]
    pub fn or(mut self, alternatives: Vec<Condition>) -> Self {
        let list = alternatives.into_iter().map(|c| Value::Object(c.0)).collect();
        self.0.insert("$or".to_string(), Value::Array(list));
        self
    }

    /// Requires every one of `clauses` to hold.
    #[must_use]
    pub fn and(mut self, clauses: Vec<Condition>) -> Self {
        let list = clauses.into_iter().map(|c| Value::Object(c.0)).collect();
        self.0.insert("$and".to_string(), Value::Array(list));
        self
    }

    /// Evaluates the condition against `data`.
    ///
    /// A missing field compares as `null`. An expected array holds when the
    /// actual value equals any of its elements.
    #[must_use]
    pub fn evaluate(&self, data: &Map<String, Value>) -> bool {
        evaluate_object(&self.0, data)
    }
}

fn evaluate_object(clause: &Map<String, Value>, data: &Map<String, Value>) -> bool {
    clause.iter().all(|(key, expected)| match key.as_str() {
        "$or" => nested(expected).any(|c| evaluate_object(c, data)),
        "$and" => nested(expected).all(|c| evaluate_object(c, data)),
        field => {
            let actual = data.get(field).unwrap_or(&Value::Null);
            match expected {
                Value::Array(options) => options.contains(actual),
                other => other == actual,
            }
        }
    })
}

fn nested(value: &Value) -> impl Iterator<Item = &Map<String, Value>> {
    value
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

/// Evaluated conditions for one item.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConditionalFields {
    /// Visibility of each field that declares `if`.
    pub visible: IndexMap<String, bool>,
    /// Requirement of each field that declares `requiredIf`.
    pub required: IndexMap<String, bool>,
}

impl ConditionalFields {
    /// Evaluates every condition in `schema` against `data`.
    #[must_use]
    pub fn evaluate(schema: &[Field], data: &Map<String, Value>) -> Self {
        let mut result = Self::default();
        for field in schema {
            if let Some(condition) = &field.condition {
                result
                    .visible
                    .insert(field.name.clone(), condition.evaluate(data));
            }
            if let Some(condition) = &field.required_if {
                result
                    .required
                    .insert(field.name.clone(), condition.evaluate(data));
            }
        }
        result
    }

    /// Returns false only for fields whose `if` condition failed.
    #[must_use]
    pub fn is_visible(&self, field: &str) -> bool {
        self.visible.get(field).copied().unwrap_or(true)
    }

    /// Returns true if the field's `requiredIf` condition holds.
    #[must_use]
    pub fn is_required(&self, field: &str) -> bool {
        self.required.get(field).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldType;
    use serde_json::json;

    fn data(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_empty_condition_holds() {
        assert!(Condition::new().evaluate(&Map::new()));
    }

    #[test]
    fn test_equality_and_missing_field() {
        let condition = Condition::new().eq("kind", json!("poem"));
        assert!(condition.evaluate(&data(json!({ "kind": "poem" }))));
        assert!(!condition.evaluate(&data(json!({ "kind": "essay" }))));
        assert!(!condition.evaluate(&Map::new()));

        let null_check = Condition::new().eq("kind", Value::Null);
        assert!(null_check.evaluate(&Map::new()));
    }

    #[test]
    fn test_expected_array_means_any_of() {
        let condition = Condition::new().eq("lang", json!(["en", "fr"]));
        assert!(condition.evaluate(&data(json!({ "lang": "fr" }))));
        assert!(!condition.evaluate(&data(json!({ "lang": "de" }))));
    }

    #[test]
    fn test_or_and_combinators() {
        let condition = Condition::new().eq("kind", json!("poem")).or(vec![
            Condition::new().eq("lang", json!("en")),
            Condition::new().eq("lang", json!("fr")),
        ]);
        assert!(condition.evaluate(&data(json!({ "kind": "poem", "lang": "fr" }))));
        assert!(!condition.evaluate(&data(json!({ "kind": "poem", "lang": "de" }))));

        let condition = Condition::new().and(vec![
            Condition::new().eq("a", json!(1)),
            Condition::new().eq("b", json!(2)),
        ]);
        assert!(condition.evaluate(&data(json!({ "a": 1, "b": 2 }))));
        assert!(!condition.evaluate(&data(json!({ "a": 1 }))));
    }

    #[test]
    fn test_deserialize_from_json() {
        let condition: Condition =
            serde_json::from_value(json!({ "$or": [{ "x": true }, { "y": true }] })).unwrap();
        assert!(condition.evaluate(&data(json!({ "y": true }))));
    }

    #[test]
    fn test_conditional_fields_evaluation() {
        let schema = vec![
            Field::new("kind", FieldType::Select),
            Field::new("meter", FieldType::String)
                .with_condition(Condition::new().eq("kind", json!("poem"))),
            Field::new("isbn", FieldType::String)
                .with_required_if(Condition::new().eq("kind", json!("book"))),
        ];

        let fields = ConditionalFields::evaluate(&schema, &data(json!({ "kind": "book" })));
        assert!(!fields.is_visible("meter"));
        assert!(fields.is_visible("kind"));
        assert!(fields.is_required("isbn"));
        assert!(!fields.is_required("meter"));
    }
}
