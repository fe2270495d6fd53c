//! Evaluation engine for generated recommendation records.
//!
//! A [`MetricRegistry`] holds the weighted metric definitions, the
//! [`comparators`] score one quality dimension each, and the
//! [`EvaluationEngine`] combines them into an [`EvaluationReport`].

pub mod comparators;
pub mod engine;
pub mod errors;
pub mod ranking;
pub mod registry;
pub mod report;

pub use comparators::{Comparator, Comparison, EvaluationInput};
pub use engine::{EMPTY_RECORD_DIAGNOSTIC, EvaluationEngine};
pub use errors::EvalError;
pub use ranking::{Candidate, LeaderboardEntry, RankedCandidate, best_per_subject, leaderboard};
pub use registry::{
    EvaluationLevel, MeasurementType, MetricDefinition, MetricKind, MetricRegistry,
    WEIGHT_TOLERANCE,
};
pub use report::{EvaluationOutcome, EvaluationReport, render_report};
