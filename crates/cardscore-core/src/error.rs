use thiserror::Error;

/// Core error type shared across cardscore crates.
#[derive(Debug, Error)]
pub enum Error {
    /// A record could not be decoded into the expected shape.
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

/// Convenience alias for results returned by cardscore crates.
pub type Result<T> = std::result::Result<T, Error>;
