//! Per-metric comparator algorithms.
//!
//! Every comparator is a pure function from the three evaluation inputs to a
//! [`Comparison`]. Comparators never fail: missing fields lower the score,
//! malformed fields take the worst-case path, and both leave a diagnostic.

pub mod heuristics;
pub mod similarity;

use cardscore_core::{ContextualSummary, FieldValue, Record, RecordField};

pub use heuristics::{
    action_correctness, channel_relevance, coherence_matrix, comment_relevance,
    historical_coherence, internal_consistency, logical_coherence, type_coherence,
    typification_relevance,
};
pub use similarity::{semantic_similarity, token_f1};

/// Sub-weights for type coherence, contextual relevance and action correctness.
pub const APPROPRIATENESS_WEIGHTS: [f64; 3] = [0.4, 0.3, 0.3];

/// Factor assigned to a heuristic whose input field is malformed.
pub const MALFORMED_FACTOR: f64 = 0.0;

/// Signature shared by all comparators.
pub type Comparator = fn(&EvaluationInput<'_>) -> Comparison;

/// Borrowed inputs of a single evaluation call.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationInput<'a> {
    pub generated: &'a Record,
    pub expected: &'a Record,
    pub context: &'a ContextualSummary,
}

impl<'a> EvaluationInput<'a> {
    pub fn new(
        generated: &'a Record,
        expected: &'a Record,
        context: &'a ContextualSummary,
    ) -> Self {
        Self {
            generated,
            expected,
            context,
        }
    }
}

/// Score and diagnostics produced by one comparator.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub score: f64,
    pub errors: Vec<String>,
}

impl Comparison {
    /// Build a comparison, clamping the score into [0, 1].
    pub fn new(score: f64, mut errors: Vec<String>) -> Self {
        let score = if score.is_finite() {
            score.clamp(0.0, 1.0)
        } else {
            errors.push(format!("computation failure: non-finite score {score}"));
            0.0
        };
        Self { score, errors }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            score: 0.0,
            errors: vec![message.into()],
        }
    }
}

/// Weighted blend of type coherence, comment relevance and action correctness.
pub fn response_appropriateness(input: &EvaluationInput<'_>) -> Comparison {
    let mut errors = Vec::new();
    let customer_type = input.context.customer_type.as_str();
    let pressure = text_field(input.generated, RecordField::PressureLevel, &mut errors);
    let comment = text_field(input.generated, RecordField::Comment, &mut errors);
    let positive_action = text_field(
        input.generated,
        RecordField::PositiveResponseAction,
        &mut errors,
    );

    let factors = [
        guarded(&[pressure], || type_coherence(customer_type, pressure.text())),
        guarded(&[comment], || {
            comment_relevance(comment.text(), &input.context.most_frequent_reason)
        }),
        guarded(&[positive_action], || {
            action_correctness(positive_action.text(), customer_type)
        }),
    ];
    let score: f64 = factors
        .iter()
        .zip(APPROPRIATENESS_WEIGHTS)
        .map(|(factor, weight)| factor * weight)
        .sum();

    Comparison::new(score.min(1.0), errors)
}

/// Mean of internal, historical and logical coherence.
pub fn semantic_coherence(input: &EvaluationInput<'_>) -> Comparison {
    let mut errors = Vec::new();
    let pressure = text_field(input.generated, RecordField::PressureLevel, &mut errors);
    let typification = text_field(
        input.generated,
        RecordField::OperationalTypification,
        &mut errors,
    );

    let profile = input.generated.get(RecordField::ClientProfile);
    if let Some(value) = profile.filter(|value| value.as_text().is_none()) {
        errors.push(malformed(RecordField::ClientProfile, "text", value));
    }

    let actions = input.generated.get(RecordField::ActionsToAvoid);
    if let Some(value) = actions.filter(|value| value.as_list().is_none()) {
        errors.push(malformed(RecordField::ActionsToAvoid, "list", value));
    }

    let factors = [
        guarded(&[pressure, typification], || {
            internal_consistency(pressure.text(), typification.text())
        }),
        historical_coherence(profile, input.context.receptivity()),
        logical_coherence(actions),
    ];

    Comparison::new(mean(&factors), errors)
}

/// Exact-match accuracy over the classification fields.
pub fn task_completion_accuracy(input: &EvaluationInput<'_>) -> Comparison {
    let mut errors = Vec::new();
    let mut correct = 0usize;

    for field in RecordField::CLASSIFICATION {
        match (input.generated.get(field), input.expected.get(field)) {
            (Some(generated), Some(expected)) if generated == expected => correct += 1,
            (Some(generated), Some(expected)) => errors.push(format!(
                "incorrect classification in {field}: expected {}, got {}",
                describe(Some(expected)),
                describe(Some(generated))
            )),
            (generated, expected) => errors.push(format!(
                "missing classification field {field}: expected {}, got {}",
                describe(expected),
                describe(generated)
            )),
        }
    }

    let total = RecordField::CLASSIFICATION.len() as f64;
    Comparison::new(correct as f64 / total, errors)
}

/// Mean of comment, typification and channel relevance against the context.
pub fn contextual_relevance(input: &EvaluationInput<'_>) -> Comparison {
    let mut errors = Vec::new();
    let customer_type = input.context.customer_type.as_str();
    let comment = text_field(input.generated, RecordField::Comment, &mut errors);
    let typification = text_field(
        input.generated,
        RecordField::OperationalTypification,
        &mut errors,
    );
    let channel = text_field(
        input.generated,
        RecordField::RecommendedChannel,
        &mut errors,
    );

    let factors = [
        guarded(&[comment], || {
            comment_relevance(comment.text(), &input.context.most_frequent_reason)
        }),
        guarded(&[typification], || {
            typification_relevance(typification.text(), customer_type)
        }),
        guarded(&[channel], || channel_relevance(channel.text(), customer_type)),
    ];

    Comparison::new(mean(&factors), errors)
}

/// Fraction of required fields that are present and non-empty.
pub fn content_completeness(input: &EvaluationInput<'_>) -> Comparison {
    let mut errors = Vec::new();
    let mut present = 0usize;

    for field in RecordField::REQUIRED {
        match input.generated.get(field) {
            Some(value) if value.is_substantive() => present += 1,
            Some(_) => errors.push(format!("field '{field}' is empty")),
            None => errors.push(format!("field '{field}' is missing")),
        }
    }

    let total = RecordField::REQUIRED.len() as f64;
    Comparison::new(present as f64 / total, errors)
}

/// Text read from a record field, keeping malformed values apart from absent ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRead<'a> {
    Text(&'a str),
    Missing,
    Malformed,
}

impl<'a> TextRead<'a> {
    /// Text content; missing and malformed values read as empty.
    pub fn text(self) -> &'a str {
        match self {
            TextRead::Text(text) => text,
            TextRead::Missing | TextRead::Malformed => "",
        }
    }

    pub fn is_malformed(self) -> bool {
        matches!(self, TextRead::Malformed)
    }
}

/// Reads a text field; a non-text value is reported as malformed.
pub fn text_field<'a>(
    record: &'a Record,
    field: RecordField,
    errors: &mut Vec<String>,
) -> TextRead<'a> {
    match record.get(field) {
        Some(FieldValue::Text(text)) => TextRead::Text(text.as_str()),
        Some(value) => {
            errors.push(malformed(field, "text", value));
            TextRead::Malformed
        }
        None => TextRead::Missing,
    }
}

/// Heuristic factor, or the worst case when any input it reads is malformed.
fn guarded(inputs: &[TextRead<'_>], heuristic: impl FnOnce() -> f64) -> f64 {
    if inputs.iter().any(|input| input.is_malformed()) {
        return MALFORMED_FACTOR;
    }
    heuristic()
}

fn malformed(field: RecordField, expected: &str, value: &FieldValue) -> String {
    format!(
        "malformed field {field}: expected {expected}, found {}",
        value.kind()
    )
}

fn describe(value: Option<&FieldValue>) -> String {
    match value {
        None => "<missing>".to_string(),
        Some(FieldValue::Text(text)) => format!("'{text}'"),
        Some(FieldValue::List(items)) => format!("{items:?}"),
        Some(FieldValue::Malformed(raw)) => raw.to_string(),
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
