use thiserror::Error;

/// Errors raised while producing engine inputs.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("invalid generator response: {0}")]
    InvalidResponse(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("core error: {0}")]
    Core(#[from] cardscore_core::Error),
}
