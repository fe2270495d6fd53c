mod inputs;
mod registry;
mod settings;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use cardscore_core::{CONTRACT_VERSION, ContextualSummary, Interaction, Record};
use cardscore_eval::{
    Candidate, EvaluationEngine, EvaluationReport, MetricRegistry, best_per_subject, leaderboard,
    render_report,
};
use cardscore_generate::{ReferenceGenerator, summarize_history};
use clap::{Args, Parser, Subcommand};
use inputs::{CandidateInput, ContextInput, read_generated, read_json};
use registry::{RunContext, RunPaths, init_run_logging, start_run, write_json, write_markdown};
use serde::Serialize;
use settings::{Settings, load_settings};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("settings error: {0}")]
    Settings(#[from] settings::SettingsError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid input {path}: {message}")]
    Input { path: PathBuf, message: String },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Parser, Debug)]
#[command(
    name = "cardscore",
    version,
    about = "Score generated call-center recommendation records"
)]
struct Cli {
    /// Settings file; defaults to ./cardscore.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate one generated record.
    Evaluate(EvaluateArgs),
    /// Evaluate a batch of candidates and rank configurations.
    Rank(RankArgs),
    /// Print the reference record for a subject.
    Reference(ContextArgs),
    /// Summarize an interaction history.
    Summarize(SummarizeArgs),
    /// Print the JSON Schema of records and contextual summaries.
    Schema,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Output directory for runs; overrides the settings file.
    #[arg(long)]
    runs_dir: Option<PathBuf>,
    /// Print results without writing a run directory.
    #[arg(long, default_value_t = false)]
    no_run: bool,
}

#[derive(Args, Debug)]
struct EvaluateArgs {
    /// Generated record (JSON object, or raw model output with --raw).
    #[arg(long)]
    generated: PathBuf,
    /// Treat the generated file as raw model output.
    #[arg(long, default_value_t = false)]
    raw: bool,
    /// Expected record; derived from the context when omitted.
    #[arg(long)]
    expected: Option<PathBuf>,
    /// Contextual summary or interaction history (JSON).
    #[arg(long)]
    context: PathBuf,
    /// Print the markdown report instead of JSON.
    #[arg(long, default_value_t = false)]
    markdown: bool,
    #[command(flatten)]
    run: RunArgs,
}

#[derive(Args, Debug)]
struct RankArgs {
    /// JSON array of candidates.
    #[arg(long)]
    candidates: PathBuf,
    #[command(flatten)]
    run: RunArgs,
}

#[derive(Args, Debug)]
struct ContextArgs {
    /// Contextual summary or interaction history (JSON).
    #[arg(long)]
    context: PathBuf,
}

#[derive(Args, Debug)]
struct SummarizeArgs {
    /// JSON array of interactions.
    #[arg(long)]
    history: PathBuf,
    /// Most recent interactions to consider; overrides the settings file.
    #[arg(long)]
    max_history: Option<usize>,
}

#[derive(Debug, Serialize)]
struct Rankings {
    best_per_subject: Vec<cardscore_eval::RankedCandidate>,
    leaderboard: Vec<cardscore_eval::LeaderboardEntry>,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Command::Evaluate(args) => run_evaluate(args, &settings),
        Command::Rank(args) => run_rank(args, &settings),
        Command::Reference(args) => run_reference(args, &settings),
        Command::Summarize(args) => run_summarize(args, &settings),
        Command::Schema => run_schema(),
    }
}

fn run_evaluate(args: EvaluateArgs, settings: &Settings) -> Result<(), CliError> {
    let registry = settings.registry()?;
    let mut inputs = BTreeMap::new();
    inputs.insert("generated".to_string(), args.generated.clone());
    inputs.insert("context".to_string(), args.context.clone());
    if let Some(expected) = &args.expected {
        inputs.insert("expected".to_string(), expected.clone());
    }
    let run_paths = begin_run("evaluate", &args.run, settings, &registry, inputs)?;

    let timer = Instant::now();
    let generated = read_generated(&args.generated, args.raw)?;
    let context = read_json::<ContextInput>(&args.context)?.into_summary(settings.max_history);
    let expected = match &args.expected {
        Some(path) => read_json::<Record>(path)?,
        None => {
            tracing::info!(event = "reference_derived", customer_type = %context.customer_type);
            ReferenceGenerator::new().expected_for(&context)
        }
    };

    let engine = EvaluationEngine::new(registry);
    let report = engine.evaluate(&generated, &expected, &context);
    let markdown = render_report(&report);

    if let Some(paths) = &run_paths {
        write_report(paths, &report, &markdown)?;
    }
    tracing::info!(
        event = "run_finished",
        status = "success",
        overall_score = report.overall_score(),
        duration_ms = timer.elapsed().as_millis()
    );

    if args.markdown {
        println!("{markdown}");
    } else {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

fn run_rank(args: RankArgs, settings: &Settings) -> Result<(), CliError> {
    let registry = settings.registry()?;
    let mut inputs = BTreeMap::new();
    inputs.insert("candidates".to_string(), args.candidates.clone());
    let run_paths = begin_run("rank", &args.run, settings, &registry, inputs)?;

    let timer = Instant::now();
    let entries: Vec<CandidateInput> = read_json(&args.candidates)?;
    if entries.is_empty() {
        return Err(CliError::InvalidConfig(
            "candidate file contains no candidates".to_string(),
        ));
    }

    let engine = EvaluationEngine::new(registry);
    let reference = ReferenceGenerator::new();
    let mut candidates = Vec::with_capacity(entries.len());
    for entry in entries {
        let context = entry.context.into_summary(settings.max_history);
        let expected = entry
            .expected
            .unwrap_or_else(|| reference.expected_for(&context));
        let generated = entry.generated.into_record();
        let report = engine.evaluate(&generated, &expected, &context);

        tracing::info!(
            event = "candidate_scored",
            subject = %entry.subject,
            template = %entry.template,
            model = %entry.model,
            overall_score = report.overall_score()
        );
        candidates.push(Candidate {
            subject: entry.subject,
            template: entry.template,
            model: entry.model,
            overall_score: report.overall_score(),
        });
    }

    let rankings = Rankings {
        best_per_subject: best_per_subject(&candidates),
        leaderboard: leaderboard(&candidates),
    };

    if let Some(paths) = &run_paths {
        write_json(&paths.rankings_path, &rankings)?;
        tracing::info!(event = "rankings_written", path = %paths.rankings_path.display());
    }
    tracing::info!(
        event = "run_finished",
        status = "success",
        candidates = candidates.len(),
        duration_ms = timer.elapsed().as_millis()
    );

    println!("{}", serde_json::to_string_pretty(&rankings)?);
    Ok(())
}

fn run_reference(args: ContextArgs, settings: &Settings) -> Result<(), CliError> {
    let context = read_json::<ContextInput>(&args.context)?.into_summary(settings.max_history);
    let expected = ReferenceGenerator::new().expected_for(&context);
    println!("{}", serde_json::to_string_pretty(&expected)?);
    Ok(())
}

fn run_summarize(args: SummarizeArgs, settings: &Settings) -> Result<(), CliError> {
    let max_history = args.max_history.unwrap_or(settings.max_history);
    if max_history == 0 {
        return Err(CliError::InvalidConfig(
            "max history must be at least 1".to_string(),
        ));
    }

    let history: Vec<Interaction> = read_json(&args.history)?;
    let summary: Option<ContextualSummary> = summarize_history(&history, max_history);
    match summary {
        Some(summary) => println!("{}", serde_json::to_string_pretty(&summary)?),
        None => {
            return Err(CliError::Input {
                path: args.history,
                message: "history has no dated interactions".to_string(),
            });
        }
    }
    Ok(())
}

fn run_schema() -> Result<(), CliError> {
    let schema = serde_json::json!({
        "contract_version": CONTRACT_VERSION,
        "record": schemars::schema_for!(Record),
        "contextual_summary": schemars::schema_for!(ContextualSummary),
    });
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

/// Create the run directory and install run logging, unless disabled.
fn begin_run(
    command: &str,
    args: &RunArgs,
    settings: &Settings,
    registry: &MetricRegistry,
    inputs: BTreeMap<String, PathBuf>,
) -> Result<Option<RunPaths>, CliError> {
    if args.no_run {
        return Ok(None);
    }

    let run_id = Uuid::new_v4().to_string();
    let ctx = RunContext {
        run_id: run_id.clone(),
        started_at: chrono::Utc::now(),
        command: command.to_string(),
        contract_version: CONTRACT_VERSION.to_string(),
        runs_dir: args
            .runs_dir
            .clone()
            .unwrap_or_else(|| settings.runs_dir.clone()),
        inputs,
        weights: registry
            .iter()
            .map(|definition| (definition.name.clone(), definition.weight))
            .collect(),
    };

    let paths = start_run(&ctx)?;
    init_run_logging(&paths.logs_path, &settings.log_level)?;
    tracing::info!(
        event = "run_started",
        run_id = %run_id,
        command = command,
        run_dir = %paths.root.display()
    );
    Ok(Some(paths))
}

fn write_report(
    paths: &RunPaths,
    report: &EvaluationReport,
    markdown: &str,
) -> Result<(), CliError> {
    write_json(&paths.report_path, report)?;
    tracing::info!(event = "report_written", path = %paths.report_path.display());
    write_markdown(&paths.markdown_path, markdown)?;
    tracing::info!(event = "markdown_written", path = %paths.markdown_path.display());
    Ok(())
}
