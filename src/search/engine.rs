//! Query engine - the process-wide context for both query modes
//!
//! Built once at startup and passed by reference. Holds the store handle,
//! the schema description, the SQL generator (if credentials exist) and the
//! embedder, which is loaded on first use.

use std::cell::OnceCell;

use serde::Serialize;

use super::backfill::{embedding_status, run_backfill, BackfillStats, EmbeddingStatus, BACKFILL_TARGETS};
use super::embedding::{load_embedder, Embedder};
use super::hybrid::HybridSearch;
use super::store::SqlStore;
use crate::core::config::{Config, EmbeddingConfig};
use crate::core::error::{QueryError, Result};
use crate::core::schema::SCHEMA_DESCRIPTION;
use crate::core::value::ResultSet;
use crate::sql::gemini::GeminiClient;
use crate::sql::generator::{PromptedSqlGenerator, SqlGenerator};
use crate::sql::guard::ensure_safe;

/// Result of the NL to SQL path
#[derive(Debug, Clone, Serialize)]
pub struct NlAnswer {
    pub sql: String,
    #[serde(flatten)]
    pub results: ResultSet,
}

pub struct QueryEngine {
    store: SqlStore,
    schema: String,
    generator: Option<Box<dyn SqlGenerator>>,
    embedding_config: EmbeddingConfig,
    embedder: OnceCell<Box<dyn Embedder>>,
}

impl QueryEngine {
    /// Engine with no generator and the default embedding provider
    pub fn new(store: SqlStore) -> Self {
        Self {
            store,
            schema: SCHEMA_DESCRIPTION.to_string(),
            generator: None,
            embedding_config: EmbeddingConfig::default(),
            embedder: OnceCell::new(),
        }
    }

    /// Wire everything from config. The Gemini generator is only attached
    /// when its API key variable is set.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut engine = Self::new(SqlStore::new(&config.database));
        engine.embedding_config = config.embedding.clone();

        match config.generator.api_key() {
            Some(key) => {
                let client = GeminiClient::from_config(&config.generator, key)?;
                engine.generator = Some(Box::new(PromptedSqlGenerator::new(client)));
            }
            None => tracing::debug!(
                "{} not set, NL to SQL disabled",
                config.generator.api_key_env
            ),
        }

        Ok(engine)
    }

    pub fn with_generator(mut self, generator: Box<dyn SqlGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Use this embedder instead of loading one from config
    pub fn with_embedder(self, embedder: Box<dyn Embedder>) -> Self {
        let cell = OnceCell::new();
        let _ = cell.set(embedder);
        Self {
            embedder: cell,
            ..self
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    pub fn store(&self) -> &SqlStore {
        &self.store
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    fn embedder(&self) -> Result<&dyn Embedder> {
        if let Some(embedder) = self.embedder.get() {
            return Ok(embedder.as_ref());
        }
        let loaded = load_embedder(&self.embedding_config)?;
        Ok(self.embedder.get_or_init(|| loaded).as_ref())
    }

    /// Question -> generated SELECT -> rows. Unsafe SQL never reaches the store.
    pub fn ask(&self, question: &str) -> Result<NlAnswer> {
        if question.trim().is_empty() {
            return Err(QueryError::InvalidArgument("question is empty".to_string()));
        }
        let generator = self.generator.as_ref().ok_or_else(|| {
            QueryError::Config(
                "no SQL generator configured (set the API key environment variable)".to_string(),
            )
        })?;

        let sql = generator.generate(question, &self.schema)?;
        ensure_safe(&sql)?;

        let results = self.store.execute(&sql, &[])?;
        tracing::info!(rows = results.len(), "NL to SQL query complete");

        Ok(NlAnswer { sql, results })
    }

    /// Nearest products to the query text, optionally under a price ceiling
    pub fn semantic_search(
        &self,
        query: &str,
        price_ceiling: Option<f64>,
        top_k: i64,
    ) -> Result<ResultSet> {
        if query.trim().is_empty() {
            return Err(QueryError::InvalidArgument("query is empty".to_string()));
        }
        let embedder = self.embedder()?;
        let results = HybridSearch::new(&self.store, embedder).search(query, price_ceiling, top_k)?;
        tracing::info!(rows = results.len(), "semantic search complete");
        Ok(results)
    }

    pub fn backfill(&self) -> Result<BackfillStats> {
        let embedder = self.embedder()?;
        run_backfill(&self.store, embedder, BACKFILL_TARGETS)
    }

    pub fn embedding_status(&self) -> Result<Vec<EmbeddingStatus>> {
        embedding_status(&self.store, BACKFILL_TARGETS)
    }
}
