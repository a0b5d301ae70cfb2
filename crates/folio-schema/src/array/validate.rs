//! Array validation outcomes and duplicate detection.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

/// Why an array value failed validation.
///
/// Codes are reported in priority order: an item with errors hides every
/// other failure, then `required`, `min`, `max`, and finally `duplicate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum ArrayFailure {
    /// At least one item's nested form has errors.
    Invalid,
    /// The field is required and the array is empty.
    Required,
    /// Fewer items than the configured minimum.
    Min,
    /// More items than the configured maximum.
    Max,
    /// Two or more items share a value in the unique sub-field.
    Duplicate {
        /// Name of the unique sub-field.
        field: String,
        /// Message naming the field.
        message: String,
    },
}

impl ArrayFailure {
    /// Returns the failure code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::Required => "required",
            Self::Min => "min",
            Self::Max => "max",
            Self::Duplicate { .. } => "duplicate",
        }
    }

    pub(crate) fn duplicate(field: &str, label: &str) -> Self {
        Self::Duplicate {
            field: field.to_string(),
            message: format!("Duplicate value in {label}"),
        }
    }
}

impl fmt::Display for ArrayFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate { message, .. } => f.write_str(message),
            other => f.write_str(other.code()),
        }
    }
}

/// Comparison key of a unique sub-field value.
///
/// Arrays (relationships) compare as their sorted, `|`-joined ids; scalars
/// compare by their JSON form. Missing values, `null`, and empty arrays
/// have no key and never count as duplicates.
pub(crate) fn unique_key(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::Array(entries) => {
            let mut ids: Vec<&str> = entries
                .iter()
                .filter_map(|entry| match entry {
                    Value::String(id) => Some(id.as_str()),
                    other => other.get("_id").and_then(Value::as_str),
                })
                .collect();
            if ids.is_empty() {
                return None;
            }
            ids.sort_unstable();
            Some(ids.join("|"))
        }
        scalar => Some(scalar.to_string()),
    }
}

/// Returns the keys that occur more than once in `field` across `items`.
pub(crate) fn duplicate_keys(items: &[Map<String, Value>], field: &str) -> HashSet<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter_map(|item| unique_key(item.get(field)))
        .filter(|key| !seen.insert(key.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn rows(values: Vec<Value>) -> Vec<Map<String, Value>> {
        values
            .into_iter()
            .filter_map(|v| v.as_object().cloned())
            .collect()
    }

    #[test]
    fn test_codes() {
        assert_eq!(ArrayFailure::Invalid.code(), "invalid");
        assert_eq!(ArrayFailure::duplicate("url", "URL").code(), "duplicate");
        assert_eq!(
            ArrayFailure::duplicate("url", "URL").to_string(),
            "Duplicate value in URL"
        );
    }

    #[test]
    fn test_failure_serializes_with_name() {
        let value = serde_json::to_value(ArrayFailure::Max).unwrap();
        assert_eq!(value, json!({ "name": "max" }));
    }

    #[test]
    fn test_relationship_key_ignores_order() {
        let a = json!([{ "_id": "b" }, { "_id": "a" }]);
        let b = json!([{ "_id": "a" }, { "_id": "b" }]);
        assert_eq!(unique_key(Some(&a)), unique_key(Some(&b)));
        assert_eq!(unique_key(Some(&a)).as_deref(), Some("a|b"));
    }

    #[test]
    fn test_empty_values_have_no_key() {
        assert_eq!(unique_key(None), None);
        assert_eq!(unique_key(Some(&Value::Null)), None);
        assert_eq!(unique_key(Some(&json!([]))), None);
    }

    #[test]
    fn test_scalars_compare_by_type_and_value() {
        assert_ne!(unique_key(Some(&json!(1))), unique_key(Some(&json!("1"))));
    }

    #[test]
    fn test_duplicate_keys() {
        let items = rows(vec![
            json!({ "url": "a" }),
            json!({ "url": "b" }),
            json!({ "url": "a" }),
            json!({}),
            json!({}),
        ]);
        let keys = duplicate_keys(&items, "url");
        assert_eq!(keys.len(), 1);
        assert!(keys.contains(&unique_key(Some(&json!("a"))).unwrap()));
    }

    proptest! {
        #[test]
        fn distinct_values_never_duplicate(values in proptest::collection::hash_set("[a-z]{1,6}", 0..12)) {
            let items: Vec<Map<String, Value>> = values
                .iter()
                .map(|v| {
                    let mut m = Map::new();
                    m.insert("slug".to_string(), json!(v));
                    m
                })
                .collect();
            prop_assert!(duplicate_keys(&items, "slug").is_empty());
        }
    }
}
