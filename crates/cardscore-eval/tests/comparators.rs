use cardscore_core::{ContextualSummary, FieldValue, Record, RecordField};
use cardscore_eval::comparators::{
    self, channel_relevance, comment_relevance, historical_coherence, logical_coherence,
    type_coherence, typification_relevance,
};
use cardscore_eval::{Comparison, EvaluationInput};
use serde_json::json;

fn run(
    comparator: fn(&EvaluationInput<'_>) -> Comparison,
    generated: &Record,
    expected: &Record,
) -> Comparison {
    let context = ContextualSummary::default();
    comparator(&EvaluationInput::new(generated, expected, &context))
}

#[test]
fn coherence_matrix_covers_every_defined_pair() {
    let cases = [
        ("receptive-high", "low", 1.0),
        ("receptive-high", "moderate", 0.7),
        ("receptive-high", "high", 0.2),
        ("receptive-moderate", "low", 0.8),
        ("receptive-moderate", "moderate", 1.0),
        ("receptive-moderate", "high", 0.6),
        ("evasive", "low", 0.3),
        ("evasive", "moderate", 0.8),
        ("evasive", "high", 1.0),
        ("problematic", "low", 1.0),
        ("problematic", "moderate", 0.5),
        ("problematic", "high", 0.2),
    ];
    for (category, pressure, expected) in cases {
        assert_eq!(
            type_coherence(category, pressure),
            expected,
            "{category} x {pressure}"
        );
    }
}

#[test]
fn coherence_matrix_is_neutral_outside_known_labels() {
    assert_eq!(type_coherence("desconocido", "alta"), 0.5);
    assert_eq!(type_coherence("Evasivo", "urgente"), 0.5);
    assert_eq!(type_coherence("Receptivo alto", "Baja"), 1.0);
}

#[test]
fn completeness_counts_each_required_field() {
    let mut generated = Record::new();
    let empty = Record::new();
    let mut previous = run(comparators::content_completeness, &generated, &empty).score;
    assert_eq!(previous, 0.0);

    for (idx, field) in RecordField::REQUIRED.into_iter().enumerate() {
        let value = if field == RecordField::ActionsToAvoid {
            FieldValue::list(["Confrontar agresividad"])
        } else {
            FieldValue::text("valor")
        };
        generated.insert(field, value);

        let comparison = run(comparators::content_completeness, &generated, &empty);
        let expected = (idx + 1) as f64 / 10.0;
        assert!((comparison.score - expected).abs() < 1e-9);
        assert!((comparison.score - previous - 0.1).abs() < 1e-9);
        assert_eq!(comparison.errors.len(), 9 - idx);
        previous = comparison.score;
    }
}

#[test]
fn completeness_reports_empty_and_missing_fields_separately() {
    let generated = Record::new()
        .with_text(RecordField::Comment, "   ")
        .with_list(RecordField::ActionsToAvoid, Vec::<String>::new());
    let comparison = run(comparators::content_completeness, &generated, &Record::new());

    assert_eq!(comparison.score, 0.0);
    assert!(comparison.errors.contains(&"field 'comment' is empty".to_string()));
    assert!(
        comparison
            .errors
            .contains(&"field 'actions_to_avoid' is empty".to_string())
    );
    assert!(
        comparison
            .errors
            .contains(&"field 'pressure_level' is missing".to_string())
    );
}

#[test]
fn accuracy_is_all_or_nothing_on_classification_fields() {
    let expected = Record::new()
        .with_text(RecordField::PressureLevel, "Baja")
        .with_text(RecordField::RecommendedChannel, "CallCenter")
        .with_text(RecordField::LastContact, "2025-05-15");

    let full = run(comparators::task_completion_accuracy, &expected, &expected);
    assert_eq!(full.score, 1.0);
    assert!(full.errors.is_empty());

    let differing = Record::new()
        .with_text(RecordField::PressureLevel, "Alta")
        .with_text(RecordField::RecommendedChannel, "Email")
        .with_text(RecordField::LastContact, "2025-01-01");
    let none = run(comparators::task_completion_accuracy, &differing, &expected);
    assert_eq!(none.score, 0.0);
    assert_eq!(none.errors.len(), 3);
    assert!(none.errors.contains(
        &"incorrect classification in pressure_level: expected 'Baja', got 'Alta'".to_string()
    ));
}

#[test]
fn accuracy_accepts_legacy_keys_on_either_side() {
    let generated = Record::from_json(json!({
        "nivel_presion": "Baja",
        "canal_recomendado": "Email"
    }))
    .expect("decode");
    let expected = Record::new()
        .with_text(RecordField::PressureLevel, "Baja")
        .with_text(RecordField::RecommendedChannel, "Email")
        .with_text(RecordField::LastContact, "2025-05-15");

    let comparison = run(comparators::task_completion_accuracy, &generated, &expected);
    assert!((comparison.score - 2.0 / 3.0).abs() < 1e-9);
    assert_eq!(
        comparison.errors,
        vec!["missing classification field last_contact: expected '2025-05-15', got <missing>"]
    );
}

#[test]
fn similarity_is_one_for_identical_text_and_zero_without_reference() {
    let record = Record::new()
        .with_text(RecordField::OperationalTypification, "Evasivo sin intención clara")
        .with_text(RecordField::PositiveResponseAction, "Excelente, aprovechemos")
        .with_text(RecordField::NegativeResponseAction, "Necesitamos una solución");

    let identical = run(comparators::semantic_similarity, &record, &record);
    assert_eq!(identical.score, 1.0);
    assert!(identical.errors.is_empty());

    let missing = run(comparators::semantic_similarity, &record, &Record::new());
    assert_eq!(missing.score, 0.0);
    assert_eq!(missing.errors.len(), 3);
}

#[test]
fn similarity_converts_non_text_values_into_diagnostics() {
    let generated = Record::new()
        .with_text(RecordField::OperationalTypification, "Evasivo")
        .with_list(RecordField::PositiveResponseAction, ["uno", "dos"])
        .with_text(RecordField::NegativeResponseAction, "No");
    let expected = Record::new()
        .with_text(RecordField::OperationalTypification, "Evasivo")
        .with_text(RecordField::PositiveResponseAction, "uno dos")
        .with_text(RecordField::NegativeResponseAction, "No");

    let comparison = run(comparators::semantic_similarity, &generated, &expected);
    assert!((comparison.score - 2.0 / 3.0).abs() < 1e-9);
    assert_eq!(
        comparison.errors,
        vec!["similarity failed for positive_response_action: expected text, found list"]
    );
}

#[test]
fn logical_coherence_grades_actions_to_avoid() {
    assert_eq!(logical_coherence(Some(&FieldValue::List(Vec::new()))), 0.3);
    assert_eq!(logical_coherence(None), 0.3);
    assert_eq!(
        logical_coherence(Some(&FieldValue::text("Confrontar agresividad"))),
        0.3
    );
    assert_eq!(
        logical_coherence(Some(&FieldValue::list([
            "Confrontar agresividad",
            "Elevar tono de voz"
        ]))),
        1.0
    );
    assert_eq!(
        logical_coherence(Some(&FieldValue::list(["Confrontar agresividad", "Gritar"]))),
        0.7
    );
}

#[test]
fn historical_coherence_follows_receptivity_thresholds() {
    let receptive = FieldValue::text("Receptivo alto con patrón positivo");
    let evasive = FieldValue::text("Evasivo - requiere estrategia");
    let moderate = FieldValue::text("Receptivo moderado");

    assert_eq!(historical_coherence(Some(&receptive), 0.8), 1.0);
    assert_eq!(historical_coherence(Some(&evasive), 0.2), 1.0);
    assert_eq!(historical_coherence(Some(&moderate), 0.5), 1.0);
    assert_eq!(historical_coherence(Some(&evasive), 0.8), 0.6);
    assert_eq!(historical_coherence(None, 0.5), 0.6);
    assert_eq!(
        historical_coherence(Some(&FieldValue::Malformed(json!({"a": 1}))), 0.8),
        0.0
    );
}

#[test]
fn relevance_factors_use_category_tables() {
    assert!((comment_relevance("Cliente esperando fondos", "fondos") - 0.8).abs() < 1e-9);
    assert_eq!(comment_relevance("Sin relación", "fondos"), 0.5);
    assert_eq!(comment_relevance("", ""), 0.5);

    assert_eq!(typification_relevance("Evasivo sin intención", "Evasivo"), 1.0);
    assert_eq!(typification_relevance("Receptivo", "Evasivo"), 0.6);
    assert_eq!(typification_relevance("", "Evasivo"), 0.5);

    assert_eq!(channel_relevance("Email", "Problemático"), 1.0);
    assert_eq!(channel_relevance("WhatsApp", "Problemático"), 1.0);
    assert_eq!(channel_relevance("CallCenter", "Receptivo moderado"), 1.0);
    assert_eq!(channel_relevance("WhatsApp", "Evasivo"), 1.0);
    assert_eq!(channel_relevance("CallCenter", "Evasivo"), 0.7);
    assert_eq!(channel_relevance("Email", ""), 0.7);
}

#[test]
fn appropriateness_uses_fixed_sub_weights() {
    let generated = Record::new()
        .with_text(RecordField::PressureLevel, "Alta")
        .with_text(RecordField::Comment, "sin relación")
        .with_text(RecordField::PositiveResponseAction, "Comprendo, revisemos opciones");
    let expected = Record::new();
    let context: ContextualSummary = serde_json::from_value(json!({
        "customer_type": "Problemático",
        "motivo_frecuente": "reclamo"
    }))
    .expect("context");

    let comparison =
        comparators::response_appropriateness(&EvaluationInput::new(&generated, &expected, &context));
    // 0.4 * 0.2 + 0.3 * 0.5 + 0.3 * 0.8
    assert!((comparison.score - 0.47).abs() < 1e-9);
}

fn receptive_flashcard() -> Record {
    Record::from_json(json!({
        "pressure_level": "Low",
        "operational_typification": "Receptive with liquidity limitation",
        "positive_response_action": "Perfect, let's coordinate payment",
        "negative_response_action": "I understand, let's find another date",
        "actions_to_avoid": ["Pressure for immediate date", "Ignore financial limitation"],
        "last_contact": "2025-05-15",
        "channel": "CallCenter",
        "comment": "Collaborative client awaiting funds",
        "recommended_channel": "CallCenter",
        "client_profile": "Receptive with clear commitment"
    }))
    .expect("decode flashcard")
}

fn run_receptive(
    comparator: fn(&EvaluationInput<'_>) -> Comparison,
    generated: &Record,
) -> Comparison {
    let context: ContextualSummary = serde_json::from_value(json!({
        "customerType": "Receptive alto",
        "receptivityRatio": 0.8,
        "mostFrequentReason": "awaiting funds"
    }))
    .expect("decode context");
    let expected = receptive_flashcard();
    comparator(&EvaluationInput::new(generated, &expected, &context))
}

fn with_malformed(field: RecordField, value: serde_json::Value) -> Record {
    let mut record = receptive_flashcard();
    record.insert(field, FieldValue::Malformed(value));
    record
}

#[test]
fn appropriateness_zeroes_factors_read_from_malformed_fields() {
    let pressure = run_receptive(
        comparators::response_appropriateness,
        &with_malformed(RecordField::PressureLevel, json!({"nested": "Low"})),
    );
    // type coherence 0.0, comment 0.8, action 0.8
    assert!((pressure.score - 0.48).abs() < 1e-9);
    assert_eq!(
        pressure.errors,
        vec!["malformed field pressure_level: expected text, found object"]
    );

    let comment = run_receptive(
        comparators::response_appropriateness,
        &with_malformed(RecordField::Comment, json!(7)),
    );
    assert!((comment.score - 0.64).abs() < 1e-9);
    assert_eq!(
        comment.errors,
        vec!["malformed field comment: expected text, found number"]
    );

    let action = run_receptive(
        comparators::response_appropriateness,
        &with_malformed(RecordField::PositiveResponseAction, json!(["Perfect", 3])),
    );
    assert!((action.score - 0.64).abs() < 1e-9);
    assert_eq!(
        action.errors,
        vec!["malformed field positive_response_action: expected text, found mixed list"]
    );
}

#[test]
fn coherence_zeroes_internal_consistency_for_malformed_inputs() {
    let mut generated = with_malformed(RecordField::PressureLevel, json!({"nested": "Low"}));
    generated.insert(
        RecordField::OperationalTypification,
        FieldValue::Malformed(json!({"nested": "Receptive"})),
    );

    let comparison = run_receptive(comparators::semantic_coherence, &generated);
    assert!((comparison.score - 2.0 / 3.0).abs() < 1e-9);
    assert_eq!(
        comparison.errors,
        vec![
            "malformed field pressure_level: expected text, found object",
            "malformed field operational_typification: expected text, found object",
        ]
    );

    let typification_only = run_receptive(
        comparators::semantic_coherence,
        &with_malformed(RecordField::OperationalTypification, json!(false)),
    );
    assert!((typification_only.score - 2.0 / 3.0).abs() < 1e-9);
}

#[test]
fn relevance_zeroes_factors_read_from_malformed_fields() {
    let channel = run_receptive(comparators::contextual_relevance, &{
        let mut record = receptive_flashcard();
        record.insert(RecordField::RecommendedChannel, FieldValue::list(["CallCenter"]));
        record
    });
    // comment 0.8, typification 1.0, channel 0.0
    assert!((channel.score - 0.6).abs() < 1e-9);
    assert_eq!(
        channel.errors,
        vec!["malformed field recommended_channel: expected text, found list"]
    );

    let typification = run_receptive(
        comparators::contextual_relevance,
        &with_malformed(RecordField::OperationalTypification, json!({"tipo": "receptivo"})),
    );
    assert!((typification.score - 0.6).abs() < 1e-9);
    assert_eq!(
        typification.errors,
        vec!["malformed field operational_typification: expected text, found object"]
    );

    let comment = run_receptive(
        comparators::contextual_relevance,
        &with_malformed(RecordField::Comment, json!(null)),
    );
    assert!((comment.score - 2.0 / 3.0).abs() < 1e-9);
    assert_eq!(
        comment.errors,
        vec!["malformed field comment: expected text, found null"]
    );
}

#[test]
fn well_formed_flashcard_keeps_full_factors() {
    let generated = receptive_flashcard();
    let coherence = run_receptive(comparators::semantic_coherence, &generated);
    assert!((coherence.score - 1.0).abs() < 1e-9);
    assert!(coherence.errors.is_empty());

    let relevance = run_receptive(comparators::contextual_relevance, &generated);
    assert!((relevance.score - 2.8 / 3.0).abs() < 1e-9);
}
