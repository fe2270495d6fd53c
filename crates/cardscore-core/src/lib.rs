//! Core contracts and helpers for cardscore.
//!
//! This crate defines the records under evaluation, the contextual summary
//! that describes the evaluated subject, and the label vocabularies shared
//! by the evaluation engine and its input producers.

pub mod context;
pub mod error;
pub mod labels;
pub mod record;
pub mod value;

pub use context::{ContextualSummary, Interaction, DEFAULT_RECEPTIVITY_RATIO};
pub use error::{Error, Result};
pub use labels::{Channel, CustomerCategory, PressureLevel, contains_any, normalize_label, tokenize};
pub use record::{Record, RecordField};
pub use value::FieldValue;

/// Current contract version for serialized records and reports.
pub const CONTRACT_VERSION: &str = "0.1";
