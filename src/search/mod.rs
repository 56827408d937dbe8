//! Embeddings, the relational store and the two query paths
//!
//! - `store`: per-call SQLite access with vector cast/distance functions
//! - `hybrid`: nearest-neighbor product search with an optional price filter
//! - `backfill`: batch job that writes embeddings into the store
//! - `engine`: context object tying store, embedder and SQL generator together

pub mod backfill;
pub mod embedding;
pub mod engine;
pub mod hybrid;
#[cfg(feature = "minilm")]
pub mod minilm;
pub mod store;
pub mod vector;

pub use embedding::{Embedder, HarmonicEmbedder};
pub use engine::{NlAnswer, QueryEngine};
pub use hybrid::HybridSearch;
pub use store::SqlStore;
