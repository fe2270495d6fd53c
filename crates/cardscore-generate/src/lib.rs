//! Producers of evaluation inputs.
//!
//! The engine scores three inputs it never builds itself. This crate holds
//! the adapters that build them: a summarizer that turns interaction history
//! into a [`ContextualSummary`](cardscore_core::ContextualSummary), a
//! template-based reference generator for expected records, and the parser
//! for raw generator responses.

pub mod context;
pub mod errors;
pub mod reference;
pub mod response;

pub use context::{ContactPattern, DEFAULT_MAX_HISTORY, summarize_history};
pub use errors::GenerateError;
pub use reference::ReferenceGenerator;
pub use response::{extract_json_block, parse_generated_response};
