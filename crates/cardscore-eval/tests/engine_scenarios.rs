use cardscore_core::{ContextualSummary, FieldValue, Record, RecordField};
use cardscore_eval::{EMPTY_RECORD_DIAGNOSTIC, EvaluationEngine, MetricKind, render_report};
use serde_json::json;

fn flashcard() -> Record {
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

fn receptive_context() -> ContextualSummary {
    serde_json::from_value(json!({
        "customerType": "Receptive alto",
        "receptivityRatio": 0.8,
        "mostFrequentReason": "awaiting funds"
    }))
    .expect("decode context")
}

fn score(report: &cardscore_eval::EvaluationReport, kind: MetricKind) -> f64 {
    report.outcome_for(kind).expect("metric present").score
}

#[test]
fn identical_records_score_close_to_full_marks() {
    let engine = EvaluationEngine::default();
    let record = flashcard();
    let report = engine.evaluate(&record, &record, &receptive_context());

    assert_eq!(score(&report, MetricKind::ContentCompleteness), 1.0);
    assert_eq!(score(&report, MetricKind::TaskCompletionAccuracy), 1.0);
    assert_eq!(score(&report, MetricKind::SemanticSimilarity), 1.0);
    assert!((score(&report, MetricKind::ResponseAppropriateness) - 0.88).abs() < 1e-9);
    assert!((score(&report, MetricKind::SemanticCoherence) - 1.0).abs() < 1e-9);
    assert!((score(&report, MetricKind::ContextualRelevance) - 2.8 / 3.0).abs() < 1e-9);
    assert!((report.overall_score() - 96.0).abs() < 1e-6);
    assert_eq!(report.error_count(), 0);
}

#[test]
fn empty_generated_record_scores_zero() {
    let engine = EvaluationEngine::default();
    let report = engine.evaluate(&Record::new(), &flashcard(), &receptive_context());

    assert_eq!(report.overall_score(), 0.0);
    assert_eq!(score(&report, MetricKind::ContentCompleteness), 0.0);
    assert_eq!(score(&report, MetricKind::SemanticSimilarity), 0.0);

    let accuracy = report
        .outcome_for(MetricKind::TaskCompletionAccuracy)
        .expect("accuracy");
    assert_eq!(accuracy.score, 0.0);
    let missing = accuracy
        .errors
        .iter()
        .filter(|error| error.starts_with("missing classification field"))
        .count();
    assert_eq!(missing, 3);

    for outcome in report.metrics() {
        assert_eq!(outcome.score, 0.0);
        assert!(outcome.errors.iter().any(|error| error == EMPTY_RECORD_DIAGNOSTIC));
    }
}

#[test]
fn overall_score_stays_bounded_for_degenerate_inputs() {
    let engine = EvaluationEngine::default();
    let inputs = [
        (Record::new(), Record::new()),
        (flashcard(), Record::new()),
        (
            Record::new().with_text(RecordField::Comment, "   "),
            Record::new(),
        ),
        (
            Record::from_json(json!({
                "cliente": {"tipo": "receptivo"},
                "acciones_a_evitar": "no es una lista",
                "nivel_presion": 3
            }))
            .expect("decode malformed"),
            flashcard(),
        ),
    ];

    for (generated, expected) in &inputs {
        let report = engine.evaluate(generated, expected, &ContextualSummary::default());
        assert!((0.0..=100.0).contains(&report.overall_score()));
        for outcome in report.metrics() {
            assert!((0.0..=1.0).contains(&outcome.score), "{}", outcome.name);
        }
    }
}

#[test]
fn malformed_profile_takes_worst_case_path() {
    let engine = EvaluationEngine::default();
    let mut generated = flashcard();
    generated.insert(
        RecordField::ClientProfile,
        FieldValue::Malformed(json!({"label": "receptive"})),
    );
    let report = engine.evaluate(&generated, &flashcard(), &receptive_context());

    let coherence = report
        .outcome_for(MetricKind::SemanticCoherence)
        .expect("coherence");
    assert!((coherence.score - 2.0 / 3.0).abs() < 1e-9);
    assert!(
        coherence
            .errors
            .iter()
            .any(|error| error.contains("malformed field client_profile"))
    );
}

#[test]
fn malformed_pressure_and_typification_are_not_coherent() {
    let engine = EvaluationEngine::default();
    let mut generated = flashcard();
    generated.insert(
        RecordField::PressureLevel,
        FieldValue::Malformed(json!({"nested": "Low"})),
    );
    generated.insert(
        RecordField::OperationalTypification,
        FieldValue::Malformed(json!({"nested": "Receptive"})),
    );
    let report = engine.evaluate(&generated, &flashcard(), &receptive_context());

    assert!((score(&report, MetricKind::SemanticCoherence) - 2.0 / 3.0).abs() < 1e-9);
    // type coherence drops to 0.0; comment and action stay at 0.8
    assert!((score(&report, MetricKind::ResponseAppropriateness) - 0.48).abs() < 1e-9);
    assert!((score(&report, MetricKind::ContextualRelevance) - 1.8 / 3.0).abs() < 1e-9);
}

#[test]
fn record_without_known_fields_scores_zero() {
    let engine = EvaluationEngine::default();
    let generated = Record::from_json(json!({"unrelated": "x"})).expect("decode record");
    let report = engine.evaluate(&generated, &flashcard(), &receptive_context());

    assert_eq!(report.overall_score(), 0.0);
    for outcome in report.metrics() {
        assert_eq!(outcome.score, 0.0);
        assert!(outcome.errors.iter().any(|error| error == EMPTY_RECORD_DIAGNOSTIC));
    }
}

#[test]
fn evaluation_is_deterministic() {
    let engine = EvaluationEngine::default();
    let generated = flashcard().with_text(RecordField::PressureLevel, "High");
    let first = engine.evaluate(&generated, &flashcard(), &receptive_context());
    let second = engine.evaluate(&generated, &flashcard(), &receptive_context());
    assert_eq!(first, second);
}

#[test]
fn engine_is_shareable_across_threads() {
    let engine = EvaluationEngine::default();
    let record = flashcard();
    let context = receptive_context();
    let baseline = engine.evaluate(&record, &record, &context);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| engine.evaluate(&record, &record, &context)))
            .collect();
        for handle in handles {
            let report = handle.join().expect("thread finished");
            assert_eq!(report, baseline);
        }
    });
}

#[test]
fn report_serializes_to_output_contract() {
    let engine = EvaluationEngine::default();
    let record = flashcard();
    let report = engine.evaluate(&record, &record, &receptive_context());
    let value = serde_json::to_value(&report).expect("serialize report");

    let object = value.as_object().expect("report object");
    assert_eq!(object.len(), 7);
    assert!(object["overall_score"].is_f64());

    let similarity = &object["semantic_similarity"];
    assert_eq!(similarity["score"], json!(1.0));
    assert_eq!(similarity["weight"], json!(0.1));
    assert_eq!(similarity["errors"], json!([]));
    assert!(similarity["citation"].as_str().is_some_and(|c| c.contains("BERTScore")));
    assert!(similarity.get("name").is_none());

    let keys: Vec<&String> = object.keys().collect();
    assert!(keys.contains(&&"response_appropriateness".to_string()));
}

#[test]
fn markdown_report_lists_metrics_and_diagnostics() {
    let engine = EvaluationEngine::default();
    let report = engine.evaluate(&Record::new(), &flashcard(), &receptive_context());
    let markdown = render_report(&report);

    assert!(markdown.starts_with("# cardscore Evaluation Report"));
    assert!(markdown.contains("| content_completeness | 0.10 | 0.0000 | 0.0000 |"));
    assert!(markdown.contains("## Diagnostics"));
    assert!(markdown.contains("- content_completeness: fill every required field."));
}
