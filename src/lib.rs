//! hybrid-nl-search library
//!
//! Natural-language access to a small relational database, two ways: a
//! hosted model writes a SELECT for the question, or the question is
//! embedded and products are ranked by vector distance.
//!
//! # Modules
//!
//! - `core`: config, errors, typed values, schema, logging setup
//! - `search`: embeddings, SQLite store, hybrid search, backfill, engine
//! - `sql`: NL to SQL generation and the read-only statement check

pub mod core;
pub mod search;
pub mod sql;

// Re-exports for convenience
pub use crate::core::config::Config;
pub use crate::core::error::{QueryError, Result};
pub use crate::core::value::{ResultSet, Value};
pub use crate::search::embedding::{cosine_similarity, Embedder, HarmonicEmbedder, EMBEDDING_DIM};
pub use crate::search::engine::{NlAnswer, QueryEngine};
pub use crate::search::hybrid::{build_hybrid_query, HybridSearch};
pub use crate::search::store::SqlStore;
pub use crate::sql::generator::{extract_sql, LanguageModel, PromptedSqlGenerator, SqlGenerator};
pub use crate::sql::guard::{ensure_safe, is_safe};
