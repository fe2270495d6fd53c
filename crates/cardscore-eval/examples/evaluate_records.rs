use std::env;
use std::path::PathBuf;

use cardscore_core::{ContextualSummary, Record};
use cardscore_eval::{EvaluationEngine, render_report};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let mut generated_path: Option<PathBuf> = None;
    let mut expected_path: Option<PathBuf> = None;
    let mut context_path: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--generated" => generated_path = args.next().map(PathBuf::from),
            "--expected" => expected_path = args.next().map(PathBuf::from),
            "--context" => context_path = args.next().map(PathBuf::from),
            _ => return Err(format!("unexpected argument: {arg}").into()),
        }
    }

    let generated_path = generated_path.ok_or("missing --generated path")?;
    let expected_path = expected_path.ok_or("missing --expected path")?;
    let context_path = context_path.ok_or("missing --context path")?;

    let generated = Record::from_json(serde_json::from_str(&std::fs::read_to_string(
        &generated_path,
    )?)?)?;
    let expected = Record::from_json(serde_json::from_str(&std::fs::read_to_string(
        &expected_path,
    )?)?)?;
    let context: ContextualSummary =
        serde_json::from_str(&std::fs::read_to_string(&context_path)?)?;

    let engine = EvaluationEngine::default();
    let report = engine.evaluate(&generated, &expected, &context);

    println!("{}", serde_json::to_string_pretty(&report)?);
    println!();
    println!("{}", render_report(&report));
    Ok(())
}
