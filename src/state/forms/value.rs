//! Field value objects and the value/error mappings a form holds

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Dynamically typed value of a single form field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<FieldValue>),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl FieldValue {
    /// Get the text value (returns empty string for non-text values)
    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(s) => s,
            _ => "",
        }
    }

    /// Get the list items (returns an empty slice for scalars)
    pub fn as_list(&self) -> &[FieldValue] {
        match self {
            FieldValue::List(items) => items,
            _ => &[],
        }
    }

    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(n) => Some(*n as f64),
            FieldValue::Float(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Loose truthiness, used when a boolean is read from an arbitrary value
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Bool(b) => *b,
            FieldValue::Int(n) => *n != 0,
            FieldValue::Float(n) => *n != 0.0 && !n.is_nan(),
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::List(_) => true,
        }
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match self {
            FieldValue::Bool(b) => (if *b { "Yes" } else { "No" }).to_string(),
            FieldValue::Int(n) => n.to_string(),
            FieldValue::Float(n) => n.to_string(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::List(items) => items
                .iter()
                .map(FieldValue::display_value)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(values: Vec<T>) -> Self {
        FieldValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Mapping from field name to its current value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(HashMap<String, FieldValue>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }

    /// Text of a field, empty when unset or not text
    pub fn text(&self, field: &str) -> &str {
        self.get(field).map(FieldValue::as_text).unwrap_or("")
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Mapping from field name to its validation message; absent means no error
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormErrors(HashMap<String, String>);

impl FormErrors {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Set or clear one field's error slot
    pub fn set(&mut self, field: &str, message: Option<String>) {
        match message {
            Some(message) => {
                self.0.insert(field.to_string(), message);
            }
            None => {
                self.0.remove(field);
            }
        }
    }

    /// Names of the fields whose slot is set
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod field_value {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_default_is_empty_text() {
            assert_eq!(FieldValue::default(), FieldValue::Text(String::new()));
        }

        #[test]
        fn test_truthiness() {
            assert!(!FieldValue::from("").is_truthy());
            assert!(FieldValue::from("x").is_truthy());
            assert!(!FieldValue::Int(0).is_truthy());
            assert!(FieldValue::Int(3).is_truthy());
            assert!(!FieldValue::Float(f64::NAN).is_truthy());
            assert!(FieldValue::List(vec![]).is_truthy());
            assert!(!FieldValue::Bool(false).is_truthy());
        }

        #[test]
        fn test_as_f64_parses_text() {
            assert_eq!(FieldValue::from(" 4.5 ").as_f64(), Some(4.5));
            assert_eq!(FieldValue::from("abc").as_f64(), None);
            assert_eq!(FieldValue::Int(2).as_f64(), Some(2.0));
        }

        #[test]
        fn test_display_value_joins_lists() {
            let value = FieldValue::from(vec!["rust", "go"]);
            assert_eq!(value.display_value(), "rust, go");
            assert_eq!(FieldValue::Bool(true).display_value(), "Yes");
        }

        #[test]
        fn test_deserialize_untagged() {
            let parsed: FieldValue = serde_json::from_str(r#"[1, "a", true, 2.5]"#).unwrap();
            assert_eq!(
                parsed,
                FieldValue::List(vec![
                    FieldValue::Int(1),
                    FieldValue::from("a"),
                    FieldValue::Bool(true),
                    FieldValue::Float(2.5),
                ])
            );
        }
    }

    mod form_values {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_serializes_as_flat_object() {
            let values: FormValues = [("name", FieldValue::from("Acme")), ("size", 12i64.into())]
                .into_iter()
                .collect();
            assert_eq!(
                serde_json::to_value(&values).unwrap(),
                serde_json::json!({ "name": "Acme", "size": 12 })
            );
        }

        #[test]
        fn test_text_of_missing_field_is_empty() {
            let values = FormValues::new();
            assert_eq!(values.text("missing"), "");
        }
    }

    mod form_errors {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_set_and_clear_slot() {
            let mut errors = FormErrors::default();
            errors.set("name", Some("Required".to_string()));
            errors.set("slug", Some("Taken".to_string()));
            assert_eq!(errors.get("name"), Some("Required"));

            errors.set("name", None);
            assert_eq!(errors.get("name"), None);
            assert_eq!(errors.get("slug"), Some("Taken"));
            assert_eq!(errors.len(), 1);
            assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["slug"]);
        }
    }
}
