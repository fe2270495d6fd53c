use cardscore_core::{ContextualSummary, Record};
use schemars::schema_for;

fn main() {
    let record = schema_for!(Record);
    let summary = schema_for!(ContextualSummary);
    let json = serde_json::json!({ "record": record, "contextual_summary": summary });
    let json = serde_json::to_string_pretty(&json).expect("serialize json schema");
    println!("{json}");
}
