//! Query result containers
//!
//! Binding rows come out of the executor in store order. A row maps a
//! requested variable token (with its leading `?`) to a resolved value or
//! null; key order follows binding order, so serialized output is stable.

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// A resolved binding value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BindingValue {
    /// A resolved scalar (entity id, statement id or datavalue)
    Text(String),
    /// Requested but unresolved; serializes as JSON null
    Null,
}

impl BindingValue {
    /// Check if this binding is null
    pub fn is_null(&self) -> bool {
        matches!(self, BindingValue::Null)
    }

    /// The scalar value, if bound
    pub fn as_str(&self) -> Option<&str> {
        match self {
            BindingValue::Text(value) => Some(value),
            BindingValue::Null => None,
        }
    }
}

impl From<String> for BindingValue {
    fn from(value: String) -> Self {
        BindingValue::Text(value)
    }
}

impl From<&str> for BindingValue {
    fn from(value: &str) -> Self {
        BindingValue::Text(value.to_string())
    }
}

impl From<Option<String>> for BindingValue {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(text) => BindingValue::Text(text),
            None => BindingValue::Null,
        }
    }
}

impl fmt::Display for BindingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingValue::Text(value) => write!(f, "{}", value),
            BindingValue::Null => write!(f, "null"),
        }
    }
}

/// One output record: requested variable tokens mapped to values
///
/// Rebinding an existing variable overwrites the value but keeps the key's
/// original position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingRow {
    #[serde(flatten)]
    bindings: IndexMap<String, BindingValue>,
}

impl BindingRow {
    /// Create an empty row
    pub fn new() -> Self {
        Self {
            bindings: IndexMap::new(),
        }
    }

    /// Bind a variable to a value
    pub fn bind(&mut self, variable: String, value: BindingValue) {
        self.bindings.insert(variable, value);
    }

    /// Get the value bound to a variable
    pub fn get(&self, variable: &str) -> Option<&BindingValue> {
        self.bindings.get(variable)
    }

    /// Check if a variable is bound (null bindings count)
    pub fn is_bound(&self, variable: &str) -> bool {
        self.bindings.contains_key(variable)
    }

    /// Number of bindings in this row
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if the row has no bindings
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterate bindings in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &BindingValue)> {
        self.bindings.iter()
    }
}

impl Default for BindingRow {
    fn default() -> Self {
        Self::new()
    }
}

/// Ordered result set of a query run
///
/// Serializes as `{"bindings": [...]}` with one JSON object per row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResults {
    /// Binding rows, in the order the store returned candidate statements
    pub bindings: Vec<BindingRow>,
}

impl QueryResults {
    /// Create an empty result set
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if the result set has no rows
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Append a row
    pub fn push(&mut self, row: BindingRow) {
        self.bindings.push(row);
    }

    /// Get a row by position
    pub fn get(&self, index: usize) -> Option<&BindingRow> {
        self.bindings.get(index)
    }

    /// Iterate rows in order
    pub fn iter(&self) -> std::slice::Iter<'_, BindingRow> {
        self.bindings.iter()
    }
}

impl Default for QueryResults {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bind_and_get() {
        let mut row = BindingRow::new();
        row.bind("?item".to_string(), BindingValue::Text("Q42".to_string()));
        assert!(row.is_bound("?item"));
        assert_eq!(row.get("?item").and_then(|v| v.as_str()), Some("Q42"));
        assert!(!row.is_bound("?label"));
        assert_eq!(row.len(), 1);
    }

    #[test]
    fn test_rebind_keeps_key_position() {
        let mut row = BindingRow::new();
        row.bind("?a".to_string(), BindingValue::Text("1".to_string()));
        row.bind("?b".to_string(), BindingValue::Text("2".to_string()));
        row.bind("?a".to_string(), BindingValue::Text("3".to_string()));

        let keys: Vec<&String> = row.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["?a", "?b"]);
        assert_eq!(row.get("?a").and_then(|v| v.as_str()), Some("3"));
    }

    #[test]
    fn test_null_binding_counts_as_bound() {
        let mut row = BindingRow::new();
        row.bind("?label".to_string(), BindingValue::Null);
        assert!(row.is_bound("?label"));
        assert!(row.get("?label").unwrap().is_null());
        assert_eq!(row.get("?label").unwrap().to_string(), "null");
    }

    #[test]
    fn test_results_serialize_as_bindings_array() {
        let mut results = QueryResults::new();
        let mut row = BindingRow::new();
        row.bind("?item".to_string(), BindingValue::Text("e1".to_string()));
        row.bind("?label".to_string(), BindingValue::Null);
        results.push(row);

        let value = serde_json::to_value(&results).unwrap();
        assert_eq!(
            value,
            json!({"bindings": [{"?item": "e1", "?label": null}]})
        );
    }

    #[test]
    fn test_empty_results_serialize() {
        let results = QueryResults::new();
        assert!(results.is_empty());
        let value = serde_json::to_value(&results).unwrap();
        assert_eq!(value, json!({"bindings": []}));
    }

    #[test]
    fn test_binding_value_conversions() {
        assert_eq!(BindingValue::from("x"), BindingValue::Text("x".to_string()));
        assert_eq!(BindingValue::from(None::<String>), BindingValue::Null);
        assert_eq!(
            BindingValue::from(Some("y".to_string())),
            BindingValue::Text("y".to_string())
        );
    }
}
