use std::panic::{AssertUnwindSafe, catch_unwind};

use cardscore_core::{ContextualSummary, Record};

use crate::comparators::{Comparison, EvaluationInput};
use crate::registry::{MetricDefinition, MetricRegistry};
use crate::report::{EvaluationOutcome, EvaluationReport};

/// Diagnostic attached to every metric when the generated record carries no
/// known field.
pub const EMPTY_RECORD_DIAGNOSTIC: &str = "empty generated record";

/// Scores generated records against a reference and context.
///
/// The engine holds only the immutable registry, so it is `Send + Sync` and a
/// single instance can serve concurrent evaluations.
#[derive(Debug, Clone, Default)]
pub struct EvaluationEngine {
    registry: MetricRegistry,
}

impl EvaluationEngine {
    pub fn new(registry: MetricRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &MetricRegistry {
        &self.registry
    }

    /// Run every comparator in registry order and aggregate the scores.
    ///
    /// A generated record without any known field, under canonical or legacy
    /// keys, scores zero on every metric whatever other keys it carries.
    pub fn evaluate(
        &self,
        generated: &Record,
        expected: &Record,
        context: &ContextualSummary,
    ) -> EvaluationReport {
        let input = EvaluationInput::new(generated, expected, context);
        let empty_generated = !generated.has_known_fields();

        let mut metrics = Vec::with_capacity(self.registry.len());
        for definition in self.registry.iter() {
            let mut comparison = run_comparator(definition, &input);
            if empty_generated {
                comparison.score = 0.0;
                comparison.errors.push(EMPTY_RECORD_DIAGNOSTIC.to_string());
            }

            tracing::debug!(
                event = "metric_evaluated",
                metric = %definition.name,
                score = comparison.score,
                errors = comparison.errors.len()
            );
            metrics.push(EvaluationOutcome::new(
                definition,
                comparison.score,
                comparison.errors,
            ));
        }

        let weighted: f64 = metrics.iter().map(|outcome| outcome.weighted_score).sum();
        let overall_score = (weighted * 100.0).clamp(0.0, 100.0);

        tracing::info!(
            event = "evaluation_finished",
            overall_score = overall_score,
            metrics = metrics.len()
        );

        EvaluationReport::new(metrics, overall_score)
    }
}

/// Runs one comparator, converting a panic into a zero score.
fn run_comparator(definition: &MetricDefinition, input: &EvaluationInput<'_>) -> Comparison {
    let comparator = definition.kind.comparator();
    match catch_unwind(AssertUnwindSafe(|| comparator(input))) {
        Ok(comparison) => comparison,
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|message| message.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::warn!(
                event = "comparator_failed",
                metric = %definition.name,
                reason = %reason
            );
            Comparison::failed(format!("computation failure: {reason}"))
        }
    }
}
