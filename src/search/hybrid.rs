//! Hybrid search: optional price filter plus nearest-neighbor ordering
//!
//! The query embedding is bound as a bracketed literal and cast with
//! `vector(?)`; rows are ordered by `l2_distance` to it, nearest first.
//! Rows without an embedding sort last. Ties fall back to SQLite's scan
//! order, which is not guaranteed to be stable.

use super::embedding::Embedder;
use super::store::SqlStore;
use super::vector::to_vector_literal;
use crate::core::error::{QueryError, Result};
use crate::core::value::{ResultSet, Value};

/// Build the hybrid search statement and its positional parameters.
///
/// Parameter order: `[price_ceiling?]`, query vector literal, `top_k`.
pub fn build_hybrid_query(
    price_ceiling: Option<f64>,
    top_k: i64,
    query_vector: &str,
) -> (String, Vec<Value>) {
    let mut sql = String::from("SELECT id, name, price\nFROM products\n");
    let mut params = Vec::with_capacity(3);

    if let Some(ceiling) = price_ceiling {
        sql.push_str("WHERE price <= ?\n");
        params.push(Value::Real(ceiling));
    }

    sql.push_str("ORDER BY l2_distance(embedding, vector(?)) ASC NULLS LAST\nLIMIT ?");
    params.push(Value::Text(query_vector.to_string()));
    params.push(Value::Integer(top_k));

    (sql, params)
}

/// Reject arguments the store would otherwise silently accept
pub fn validate_search_args(price_ceiling: Option<f64>, top_k: i64) -> Result<()> {
    if top_k <= 0 {
        return Err(QueryError::InvalidArgument(format!(
            "result limit must be positive, got {}",
            top_k
        )));
    }
    if let Some(ceiling) = price_ceiling {
        if !ceiling.is_finite() || ceiling < 0.0 {
            return Err(QueryError::InvalidArgument(format!(
                "price ceiling must be a non-negative number, got {}",
                ceiling
            )));
        }
    }
    Ok(())
}

/// Embedding-driven product search
pub struct HybridSearch<'a> {
    store: &'a SqlStore,
    embedder: &'a dyn Embedder,
}

impl<'a> HybridSearch<'a> {
    pub fn new(store: &'a SqlStore, embedder: &'a dyn Embedder) -> Self {
        Self { store, embedder }
    }

    pub fn search(&self, query: &str, price_ceiling: Option<f64>, top_k: i64) -> Result<ResultSet> {
        validate_search_args(price_ceiling, top_k)?;

        let query_embedding = self.embedder.embed(query)?;
        let literal = to_vector_literal(&query_embedding);
        let (sql, params) = build_hybrid_query(price_ceiling, top_k, &literal);

        tracing::debug!(
            price_ceiling = ?price_ceiling,
            top_k,
            dims = query_embedding.len(),
            "running hybrid search"
        );

        self.store.execute(&sql, &params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Maps every query to the same fixed vector
    struct FixedEmbedder(Vec<f32>);

    impl Embedder for FixedEmbedder {
        fn dimension(&self) -> usize {
            self.0.len()
        }

        fn embed(&self, text: &str) -> Result<Vec<f32>> {
            if text.trim().is_empty() {
                return Err(QueryError::Embedding("empty".to_string()));
            }
            Ok(self.0.clone())
        }
    }

    /// Products at distance 3, 1, 0 and one without an embedding, inserted
    /// out of distance order
    fn synthetic_store() -> (TempDir, SqlStore) {
        let tmp = TempDir::new().unwrap();
        let store = SqlStore::new(tmp.path().join("hybrid.db"));
        store.init_schema(false).unwrap();

        let rows: [(i64, &str, f64, Option<Vec<f32>>); 4] = [
            (1, "far", 50.0, Some(vec![4.0, 0.0, 0.0])),
            (2, "near", 900.0, Some(vec![2.0, 0.0, 0.0])),
            (3, "exact", 300.0, Some(vec![1.0, 0.0, 0.0])),
            (4, "unembedded", 10.0, None),
        ];
        for (id, name, price, embedding) in rows {
            store
                .execute(
                    "INSERT INTO products (id, name, price, embedding) VALUES (?, ?, ?, ?)",
                    &[
                        Value::Integer(id),
                        Value::from(name),
                        Value::Real(price),
                        Value::from(embedding),
                    ],
                )
                .unwrap();
        }
        (tmp, store)
    }

    fn names(rs: &ResultSet) -> Vec<&str> {
        rs.column("name")
            .unwrap()
            .into_iter()
            .map(|v| v.as_str().unwrap())
            .collect()
    }

    #[test]
    fn test_query_without_price_has_no_where() {
        let (sql, params) = build_hybrid_query(None, 10, "[1,2]");
        assert!(!sql.contains("WHERE"));
        assert!(sql.contains("ORDER BY l2_distance(embedding, vector(?))"));
        assert_eq!(params, vec![Value::from("[1,2]"), Value::Integer(10)]);
    }

    #[test]
    fn test_query_with_price_binds_ceiling_first() {
        let (sql, params) = build_hybrid_query(Some(500.0), 3, "[1,2]");
        assert!(sql.contains("WHERE price <= ?"));
        assert!(sql.find("WHERE").unwrap() < sql.find("ORDER BY").unwrap());
        assert_eq!(
            params,
            vec![Value::Real(500.0), Value::from("[1,2]"), Value::Integer(3)]
        );
    }

    #[test]
    fn test_results_in_distance_order() {
        let (_tmp, store) = synthetic_store();
        let embedder = FixedEmbedder(vec![1.0, 0.0, 0.0]);
        let search = HybridSearch::new(&store, &embedder);

        let rs = search.search("anything", None, 3).unwrap();
        assert_eq!(rs.columns, vec!["id", "name", "price"]);
        assert_eq!(names(&rs), vec!["exact", "near", "far"]);
    }

    #[test]
    fn test_unembedded_rows_sort_last() {
        let (_tmp, store) = synthetic_store();
        let embedder = FixedEmbedder(vec![1.0, 0.0, 0.0]);
        let rs = HybridSearch::new(&store, &embedder)
            .search("anything", None, 10)
            .unwrap();
        assert_eq!(names(&rs), vec!["exact", "near", "far", "unembedded"]);
    }

    #[test]
    fn test_price_ceiling_filters() {
        let (_tmp, store) = synthetic_store();
        let embedder = FixedEmbedder(vec![1.0, 0.0, 0.0]);
        let rs = HybridSearch::new(&store, &embedder)
            .search("anything", Some(500.0), 10)
            .unwrap();
        assert_eq!(names(&rs), vec!["exact", "far", "unembedded"]);
    }

    #[test]
    fn test_top_k_limits() {
        let (_tmp, store) = synthetic_store();
        let embedder = FixedEmbedder(vec![1.0, 0.0, 0.0]);
        let rs = HybridSearch::new(&store, &embedder)
            .search("anything", None, 1)
            .unwrap();
        assert_eq!(names(&rs), vec!["exact"]);
    }

    #[test]
    fn test_non_positive_top_k_rejected() {
        let (_tmp, store) = synthetic_store();
        let embedder = FixedEmbedder(vec![1.0, 0.0, 0.0]);
        let search = HybridSearch::new(&store, &embedder);

        for top_k in [0, -5] {
            assert!(matches!(
                search.search("anything", None, top_k),
                Err(QueryError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_malformed_price_rejected() {
        for ceiling in [f64::NAN, f64::INFINITY, -1.0] {
            assert!(matches!(
                validate_search_args(Some(ceiling), 5),
                Err(QueryError::InvalidArgument(_))
            ));
        }
        assert!(validate_search_args(Some(0.0), 5).is_ok());
        assert!(validate_search_args(None, 1).is_ok());
    }

    #[test]
    fn test_dimension_mismatch_is_store_error() {
        let (_tmp, store) = synthetic_store();
        let embedder = FixedEmbedder(vec![1.0, 0.0]);
        assert!(matches!(
            HybridSearch::new(&store, &embedder).search("anything", None, 3),
            Err(QueryError::Store(_))
        ));
    }
}
