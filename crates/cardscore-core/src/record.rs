use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::value::FieldValue;

/// Known fields of a recommendation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecordField {
    PressureLevel,
    OperationalTypification,
    FirstDialogue,
    PositiveResponseAction,
    NegativeResponseAction,
    ActionsToAvoid,
    LastContact,
    Channel,
    Comment,
    RecommendedChannel,
    ClientProfile,
}

impl RecordField {
    pub const ALL: [RecordField; 11] = [
        RecordField::PressureLevel,
        RecordField::OperationalTypification,
        RecordField::FirstDialogue,
        RecordField::PositiveResponseAction,
        RecordField::NegativeResponseAction,
        RecordField::ActionsToAvoid,
        RecordField::LastContact,
        RecordField::Channel,
        RecordField::Comment,
        RecordField::RecommendedChannel,
        RecordField::ClientProfile,
    ];

    /// Fields a complete record must carry.
    pub const REQUIRED: [RecordField; 10] = [
        RecordField::PressureLevel,
        RecordField::OperationalTypification,
        RecordField::PositiveResponseAction,
        RecordField::NegativeResponseAction,
        RecordField::ActionsToAvoid,
        RecordField::LastContact,
        RecordField::Channel,
        RecordField::Comment,
        RecordField::RecommendedChannel,
        RecordField::ClientProfile,
    ];

    /// Categorical fields compared by plain equality.
    pub const CLASSIFICATION: [RecordField; 3] = [
        RecordField::PressureLevel,
        RecordField::RecommendedChannel,
        RecordField::LastContact,
    ];

    /// Free-text fields compared lexically.
    pub const FREE_TEXT: [RecordField; 3] = [
        RecordField::OperationalTypification,
        RecordField::PositiveResponseAction,
        RecordField::NegativeResponseAction,
    ];

    /// Canonical key used when serializing records.
    pub fn key(self) -> &'static str {
        match self {
            RecordField::PressureLevel => "pressure_level",
            RecordField::OperationalTypification => "operational_typification",
            RecordField::FirstDialogue => "first_dialogue",
            RecordField::PositiveResponseAction => "positive_response_action",
            RecordField::NegativeResponseAction => "negative_response_action",
            RecordField::ActionsToAvoid => "actions_to_avoid",
            RecordField::LastContact => "last_contact",
            RecordField::Channel => "channel",
            RecordField::Comment => "comment",
            RecordField::RecommendedChannel => "recommended_channel",
            RecordField::ClientProfile => "client_profile",
        }
    }

    /// Key emitted by the legacy Spanish-language generator prompts.
    pub fn legacy_key(self) -> &'static str {
        match self {
            RecordField::PressureLevel => "nivel_presion",
            RecordField::OperationalTypification => "tipificacion_operativa",
            RecordField::FirstDialogue => "primer_dialogo",
            RecordField::PositiveResponseAction => "accion_si_responde_si",
            RecordField::NegativeResponseAction => "accion_si_responde_no",
            RecordField::ActionsToAvoid => "acciones_a_evitar",
            RecordField::LastContact => "ultimo_contacto",
            RecordField::Channel => "canal",
            RecordField::Comment => "comentario",
            RecordField::RecommendedChannel => "canal_recomendado",
            RecordField::ClientProfile => "cliente",
        }
    }

    /// Resolve a field from either its canonical or legacy key.
    pub fn from_key(key: &str) -> Option<RecordField> {
        RecordField::ALL
            .into_iter()
            .find(|field| field.key() == key || field.legacy_key() == key)
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A structured recommendation: field key to value.
///
/// Generated and expected records share this shape. Unknown keys are kept
/// so nothing the producer emitted is lost, but only [`RecordField`]s are
/// scored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a record from a JSON value, which must be an object.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::InvalidRecord(format!(
                "expected a JSON object, found {}",
                json_kind(&value)
            )));
        }
        serde_json::from_value(value).map_err(|err| Error::InvalidRecord(err.to_string()))
    }

    /// Look up a field, preferring the canonical key over the legacy one.
    pub fn get(&self, field: RecordField) -> Option<&FieldValue> {
        self.fields
            .get(field.key())
            .or_else(|| self.fields.get(field.legacy_key()))
    }

    pub fn contains(&self, field: RecordField) -> bool {
        self.get(field).is_some()
    }

    /// Text content of a field; missing and non-text values read as empty.
    pub fn text(&self, field: RecordField) -> &str {
        self.get(field).map(FieldValue::text_or_empty).unwrap_or("")
    }

    pub fn insert(&mut self, field: RecordField, value: impl Into<FieldValue>) {
        self.fields.insert(field.key().to_string(), value.into());
    }

    pub fn insert_raw(&mut self, key: impl Into<String>, value: FieldValue) {
        self.fields.insert(key.into(), value);
    }

    pub fn with_text(mut self, field: RecordField, value: impl Into<String>) -> Self {
        self.insert(field, FieldValue::Text(value.into()));
        self
    }

    pub fn with_list<I, S>(mut self, field: RecordField, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(field, FieldValue::list(items));
        self
    }

    /// True when at least one [`RecordField`] is present, under either key.
    pub fn has_known_fields(&self) -> bool {
        RecordField::ALL.into_iter().any(|field| self.contains(field))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
