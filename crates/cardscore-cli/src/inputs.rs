use std::path::Path;

use cardscore_core::{ContextualSummary, Interaction, Record};
use cardscore_generate::{GenerateError, parse_generated_response, summarize_history};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::CliError;

/// A generated record, either already structured or as raw model output.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GeneratedInput {
    Record(Record),
    Raw(String),
}

impl GeneratedInput {
    /// Raw output that carries no parseable record scores as an empty record.
    pub fn into_record(self) -> Record {
        match self {
            GeneratedInput::Record(record) => record,
            GeneratedInput::Raw(raw) => match parse_generated_response(&raw) {
                Ok(record) => record,
                Err(err) => {
                    tracing::warn!(event = "generated_response_rejected", error = %err);
                    Record::new()
                }
            },
        }
    }
}

/// Subject context, either pre-computed or as raw interaction history.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ContextInput {
    History(Vec<Interaction>),
    Summary(ContextualSummary),
}

impl ContextInput {
    /// Empty histories yield a default summary.
    pub fn into_summary(self, max_history: usize) -> ContextualSummary {
        match self {
            ContextInput::Summary(summary) => summary,
            ContextInput::History(history) => {
                summarize_history(&history, max_history).unwrap_or_default()
            }
        }
    }
}

/// One entry of a ranking input file.
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateInput {
    pub subject: String,
    pub template: String,
    pub model: String,
    pub generated: GeneratedInput,
    #[serde(default)]
    pub expected: Option<Record>,
    pub context: ContextInput,
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::Input {
        path: path.to_path_buf(),
        message: source.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|source| CliError::Input {
        path: path.to_path_buf(),
        message: source.to_string(),
    })
}

/// Read a generated record; `raw` treats the file as unparsed model output.
pub fn read_generated(path: &Path, raw: bool) -> Result<Record, CliError> {
    if !raw {
        return read_json(path);
    }
    let content = std::fs::read_to_string(path).map_err(|source| CliError::Input {
        path: path.to_path_buf(),
        message: source.to_string(),
    })?;
    parse_generated_response(&content).map_err(|err: GenerateError| CliError::Input {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn candidate_accepts_raw_output_and_history() {
        let candidate: CandidateInput = serde_json::from_value(json!({
            "subject": "ana",
            "template": "zero_shot",
            "model": "m1",
            "generated": "```json\n{\"channel\": \"Email\"}\n```",
            "context": [
                {"Fecha_Gestion": "2024-05-01", "Detalle_Resultado": "Compromiso de pago", "Motivo": "Desempleo"},
                {"Fecha_Gestion": "2024-04-20", "Detalle_Resultado": "Sin compromiso", "Motivo": "Desempleo"}
            ]
        }))
        .unwrap();

        assert!(candidate.expected.is_none());
        let record = candidate.generated.into_record();
        assert_eq!(record.text(cardscore_core::RecordField::Channel), "Email");

        let summary = candidate.context.into_summary(5);
        assert_eq!(summary.most_frequent_reason, "Desempleo");
        assert_eq!(summary.total_interactions, Some(2));
    }

    #[test]
    fn summary_context_and_structured_record() {
        let candidate: CandidateInput = serde_json::from_value(json!({
            "subject": "ben",
            "template": "few_shot",
            "model": "m2",
            "generated": {"canal": "WhatsApp"},
            "expected": {"canal": "Email"},
            "context": {"customerType": "Evasivo", "receptivityRatio": 0.2}
        }))
        .unwrap();

        let summary = candidate.context.into_summary(5);
        assert_eq!(summary.customer_type, "Evasivo");
        assert!(matches!(candidate.generated, GeneratedInput::Record(_)));
    }

    #[test]
    fn unparseable_raw_output_becomes_empty_record() {
        let generated = GeneratedInput::Raw("no record here".to_string());
        assert!(generated.into_record().is_empty());
    }
}
