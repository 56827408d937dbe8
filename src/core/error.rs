use thiserror::Error;

use crate::search::vector::VectorError;

/// Errors surfaced by the query pipeline.
///
/// Nothing in the library recovers from these locally; they propagate to the
/// top-level caller unchanged.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The generative model returned nothing usable.
    #[error("SQL generation failed: {0}")]
    Generation(String),

    #[error("generation request failed")]
    Transport(#[from] reqwest::Error),

    /// Statement rejected by the safety validator. Carries the statement.
    #[error("only SELECT queries are allowed, refusing to run: {0}")]
    UnsafeStatement(String),

    #[error(transparent)]
    Store(#[from] rusqlite::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("embedding failed: {0}")]
    Embedding(String),

    #[error(transparent)]
    Vector(#[from] VectorError),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, QueryError>;
