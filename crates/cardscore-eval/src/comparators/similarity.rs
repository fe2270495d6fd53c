//! Deterministic stand-in for an embedding-based similarity metric.
//!
//! Token-set F1 over lower-cased whitespace tokens. It intentionally makes no
//! external calls; a real embedding scorer would be a separate comparator.

use cardscore_core::{FieldValue, RecordField, tokenize};

use super::{Comparison, EvaluationInput};

/// Harmonic mean of token precision and recall; 0.0 when either side is empty.
pub fn token_f1(candidate: &str, reference: &str) -> f64 {
    let candidate_tokens = tokenize(candidate);
    let reference_tokens = tokenize(reference);
    if candidate_tokens.is_empty() || reference_tokens.is_empty() {
        return 0.0;
    }

    let overlap = candidate_tokens.intersection(&reference_tokens).count() as f64;
    let precision = overlap / candidate_tokens.len() as f64;
    let recall = overlap / reference_tokens.len() as f64;
    if precision + recall == 0.0 {
        return 0.0;
    }

    2.0 * precision * recall / (precision + recall)
}

/// Average token F1 over the free-text fields of both records.
pub fn semantic_similarity(input: &EvaluationInput<'_>) -> Comparison {
    let mut errors = Vec::new();
    let mut total = 0.0;

    for field in RecordField::FREE_TEXT {
        let generated = input.generated.get(field);
        let expected = input.expected.get(field);
        match (generated, expected) {
            (Some(generated), Some(expected)) => match field_f1(generated, expected) {
                Ok(f1) => total += f1,
                Err(message) => {
                    tracing::warn!(
                        event = "similarity_failed",
                        field = %field,
                        reason = %message
                    );
                    errors.push(format!("similarity failed for {field}: {message}"));
                }
            },
            (None, Some(_)) => errors.push(format!(
                "field {field} missing from generated record for similarity"
            )),
            (Some(_), None) => errors.push(format!(
                "field {field} missing from expected record for similarity"
            )),
            (None, None) => errors.push(format!(
                "field {field} missing from both records for similarity"
            )),
        }
    }

    let count = RecordField::FREE_TEXT.len() as f64;
    Comparison::new(total / count, errors)
}

fn field_f1(generated: &FieldValue, expected: &FieldValue) -> Result<f64, String> {
    match (generated, expected) {
        (FieldValue::Text(candidate), FieldValue::Text(reference)) => {
            Ok(token_f1(candidate, reference))
        }
        (FieldValue::Text(_), other) | (other, _) => {
            Err(format!("expected text, found {}", other.kind()))
        }
    }
}
