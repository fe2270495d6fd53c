use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::registry::{MetricDefinition, MetricKind};

/// Result of one metric for one evaluation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationOutcome {
    #[serde(skip_serializing)]
    pub name: String,
    #[serde(skip_serializing)]
    pub kind: MetricKind,
    pub score: f64,
    pub weight: f64,
    pub weighted_score: f64,
    pub errors: Vec<String>,
    pub reference: String,
    pub citation: String,
}

impl EvaluationOutcome {
    pub fn new(definition: &MetricDefinition, score: f64, errors: Vec<String>) -> Self {
        Self {
            name: definition.name.clone(),
            kind: definition.kind,
            score,
            weight: definition.weight,
            weighted_score: score * definition.weight,
            errors,
            reference: definition.reference.clone(),
            citation: definition.citation.clone(),
        }
    }
}

/// Terminal snapshot of one evaluation: per-metric detail plus overall score.
///
/// Serializes as a map from metric name to outcome, in registry order, with an
/// `overall_score` entry after the metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    metrics: Vec<EvaluationOutcome>,
    overall_score: f64,
}

impl EvaluationReport {
    pub(crate) fn new(metrics: Vec<EvaluationOutcome>, overall_score: f64) -> Self {
        Self {
            metrics,
            overall_score,
        }
    }

    /// Weighted sum of metric scores scaled to [0, 100].
    pub fn overall_score(&self) -> f64 {
        self.overall_score
    }

    pub fn metrics(&self) -> &[EvaluationOutcome] {
        &self.metrics
    }

    pub fn outcome(&self, name: &str) -> Option<&EvaluationOutcome> {
        self.metrics.iter().find(|outcome| outcome.name == name)
    }

    pub fn outcome_for(&self, kind: MetricKind) -> Option<&EvaluationOutcome> {
        self.metrics.iter().find(|outcome| outcome.kind == kind)
    }

    pub fn score(&self, name: &str) -> Option<f64> {
        self.outcome(name).map(|outcome| outcome.score)
    }

    pub fn error_count(&self) -> usize {
        self.metrics.iter().map(|outcome| outcome.errors.len()).sum()
    }
}

impl Serialize for EvaluationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.metrics.len() + 1))?;
        for outcome in &self.metrics {
            map.serialize_entry(&outcome.name, outcome)?;
        }
        map.serialize_entry("overall_score", &self.overall_score)?;
        map.end()
    }
}

/// Score below which a metric earns a recommendation line.
const RECOMMENDATION_THRESHOLD: f64 = 0.6;

/// Render a deterministic markdown report.
pub fn render_report(report: &EvaluationReport) -> String {
    let mut lines = Vec::new();

    lines.push("# cardscore Evaluation Report".to_string());
    lines.push(String::new());
    lines.push("## Summary".to_string());
    lines.push(format!("- overall_score: {:.2}", report.overall_score));
    lines.push(format!("- metrics: {}", report.metrics.len()));
    lines.push(format!("- diagnostics: {}", report.error_count()));
    lines.push(String::new());

    lines.push("## Metrics".to_string());
    lines.push("| metric | weight | score | weighted_score |".to_string());
    lines.push("| --- | --- | --- | --- |".to_string());
    for outcome in &report.metrics {
        lines.push(format!(
            "| {} | {:.2} | {:.4} | {:.4} |",
            outcome.name, outcome.weight, outcome.score, outcome.weighted_score
        ));
    }
    lines.push(String::new());

    if report.error_count() > 0 {
        lines.push("## Diagnostics".to_string());
        for outcome in &report.metrics {
            for error in &outcome.errors {
                lines.push(format!("- {}: {}", outcome.name, error));
            }
        }
        lines.push(String::new());
    }

    lines.push("## Recommendations".to_string());
    lines.extend(recommendations(report));
    lines.join("\n")
}

fn recommendations(report: &EvaluationReport) -> Vec<String> {
    let mut lines = Vec::new();
    for outcome in &report.metrics {
        if outcome.score >= RECOMMENDATION_THRESHOLD {
            continue;
        }
        let hint = match outcome.kind {
            MetricKind::ResponseAppropriateness => {
                "align pressure level and positive action with the customer type."
            }
            MetricKind::SemanticCoherence => {
                "keep typification, client profile and actions to avoid consistent."
            }
            MetricKind::TaskCompletionAccuracy => {
                "check pressure level, recommended channel and last contact against the reference."
            }
            MetricKind::ContextualRelevance => {
                "ground the comment and channel in the customer's history."
            }
            MetricKind::ContentCompleteness => "fill every required field.",
            MetricKind::SemanticSimilarity => {
                "bring free-text fields closer to the reference wording."
            }
        };
        lines.push(format!("- {}: {}", outcome.name, hint));
    }
    if lines.is_empty() {
        lines.push("- all metrics above threshold; compare configurations for drift.".to_string());
    }
    lines
}
