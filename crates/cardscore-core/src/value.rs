use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Value stored under a record field.
///
/// Generators are expected to emit free text or a list of free-text items.
/// Anything else (nested objects, numbers, lists with non-text items) is kept
/// as [`FieldValue::Malformed`] so comparators can score it explicitly instead
/// of failing on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Malformed(Value),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, FieldValue::Malformed(_))
    }

    /// Text content, or an empty string for non-text values.
    pub fn text_or_empty(&self) -> &str {
        self.as_text().unwrap_or("")
    }

    /// Returns true when the value carries usable content.
    ///
    /// Text must be non-blank and lists non-empty. Malformed values follow
    /// JSON truthiness: null, false, zero and empty containers are empty.
    pub fn is_substantive(&self) -> bool {
        match self {
            FieldValue::Text(value) => !value.trim().is_empty(),
            FieldValue::List(items) => !items.is_empty(),
            FieldValue::Malformed(value) => is_truthy(value),
        }
    }

    /// Short name of the value shape, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::List(_) => "list",
            FieldValue::Malformed(Value::Object(_)) => "object",
            FieldValue::Malformed(Value::Array(_)) => "mixed list",
            FieldValue::Malformed(Value::Number(_)) => "number",
            FieldValue::Malformed(Value::Bool(_)) => "boolean",
            FieldValue::Malformed(Value::Null) => "null",
            FieldValue::Malformed(Value::String(_)) => "text",
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

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::List(items)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
