use thiserror::Error;

/// Errors emitted while configuring the evaluation engine.
///
/// Evaluation itself never fails: comparator problems are reported as
/// diagnostics inside the report.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("metric weights sum to {total}, expected 1.0")]
    InvalidWeights { total: f64 },
    #[error("metric '{name}' has weight {weight}, expected a value in (0, 1]")]
    InvalidWeight { name: String, weight: f64 },
    #[error("duplicate metric: {0}")]
    DuplicateMetric(String),
    #[error("unknown metric: {0}")]
    UnknownMetric(String),
    #[error("registry has no metrics")]
    EmptyRegistry,
}
