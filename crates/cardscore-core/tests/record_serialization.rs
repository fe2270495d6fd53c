use cardscore_core::{ContextualSummary, FieldValue, Record, RecordField};
use schemars::schema_for;
use serde_json::json;

#[test]
fn serializes_record_deterministically() {
    let record = Record::new()
        .with_text(RecordField::RecommendedChannel, "CallCenter")
        .with_list(
            RecordField::ActionsToAvoid,
            ["Pressure for immediate date"],
        )
        .with_text(RecordField::PressureLevel, "Low");

    let json = serde_json::to_string(&record).expect("serialize record");
    assert_eq!(
        json,
        r#"{"actions_to_avoid":["Pressure for immediate date"],"pressure_level":"Low","recommended_channel":"CallCenter"}"#
    );
}

#[test]
fn keeps_unknown_keys_and_malformed_values() {
    let record = Record::from_json(json!({
        "cliente": {"tipo": "receptivo"},
        "extra_note": "kept"
    }))
    .expect("decode record");

    let profile = record.get(RecordField::ClientProfile).expect("profile");
    assert!(profile.is_malformed());
    assert_eq!(record.text(RecordField::ClientProfile), "");
    assert_eq!(record.len(), 2);
    assert!(
        record
            .iter()
            .any(|(key, value)| key == "extra_note" && *value == FieldValue::text("kept"))
    );
}

#[test]
fn summary_round_trips_without_optional_fields() {
    let summary: ContextualSummary = serde_json::from_value(json!({
        "customerType": "Receptive alto",
        "receptivityRatio": 0.8,
        "mostFrequentReason": "awaiting funds"
    }))
    .expect("decode summary");

    let encoded = serde_json::to_value(&summary).expect("encode summary");
    assert_eq!(
        encoded,
        json!({
            "customer_type": "Receptive alto",
            "receptivity_ratio": 0.8,
            "most_frequent_reason": "awaiting funds"
        })
    );
}

#[test]
fn record_json_schema_describes_an_object() {
    let schema = schema_for!(Record);
    let value = serde_json::to_value(&schema).expect("serialize schema");
    assert_eq!(value["type"], json!("object"));
}
