//! Batch embedding backfill
//!
//! Reads every row of each target table, embeds its text column and writes
//! the vector back, one UPDATE per row, all inside a single transaction that
//! is committed once at the end. A failure anywhere drops the transaction
//! uncommitted. There is no checkpoint: a re-run recomputes every row.

use std::time::Instant;

use rusqlite::params;
use serde::Serialize;

use super::embedding::Embedder;
use super::store::SqlStore;
use super::vector::vector_to_blob;
use crate::core::error::Result;

/// A text column whose embedding lives in another column of the same row
#[derive(Debug, Clone, Copy)]
pub struct BackfillTarget {
    pub table: &'static str,
    pub text_column: &'static str,
    pub embedding_column: &'static str,
}

pub const BACKFILL_TARGETS: &[BackfillTarget] = &[
    BackfillTarget {
        table: "products",
        text_column: "name",
        embedding_column: "embedding",
    },
    BackfillTarget {
        table: "orders",
        text_column: "customer_name",
        embedding_column: "customer_embedding",
    },
];

#[derive(Debug, Clone, Serialize)]
pub struct TargetStats {
    pub table: String,
    pub embedded: usize,
    /// Rows whose text was NULL or blank
    pub skipped: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BackfillStats {
    pub targets: Vec<TargetStats>,
    pub duration_ms: u128,
}

impl BackfillStats {
    pub fn embedded(&self) -> usize {
        self.targets.iter().map(|t| t.embedded).sum()
    }

    pub fn skipped(&self) -> usize {
        self.targets.iter().map(|t| t.skipped).sum()
    }
}

/// Embedding coverage of one target
#[derive(Debug, Clone, Serialize)]
pub struct EmbeddingStatus {
    pub table: String,
    pub rows: i64,
    pub embedded: i64,
}

pub fn run_backfill(
    store: &SqlStore,
    embedder: &dyn Embedder,
    targets: &[BackfillTarget],
) -> Result<BackfillStats> {
    let start = Instant::now();
    let mut conn = store.connect()?;
    let tx = conn.transaction()?;

    let mut stats = Vec::with_capacity(targets.len());

    for target in targets {
        let rows: Vec<(i64, Option<String>)> = {
            let mut stmt = tx.prepare(&format!(
                "SELECT id, {} FROM {}",
                target.text_column, target.table
            ))?;
            let mapped = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
            let collected = mapped.collect::<rusqlite::Result<Vec<_>>>()?;
            collected
        };

        let (pending, blank): (Vec<_>, Vec<_>) = rows
            .iter()
            .partition(|(_, text)| text.as_deref().is_some_and(|t| !t.trim().is_empty()));

        let texts: Vec<&str> = pending
            .iter()
            .filter_map(|(_, text)| text.as_deref())
            .collect();
        let embeddings = embedder.embed_batch(&texts)?;

        let update = format!(
            "UPDATE {} SET {} = ?1 WHERE id = ?2",
            target.table, target.embedding_column
        );
        for ((id, _), embedding) in pending.iter().zip(&embeddings) {
            tx.execute(&update, params![vector_to_blob(embedding), id])?;
        }

        tracing::info!(
            table = target.table,
            embedded = embeddings.len(),
            skipped = blank.len(),
            "embeddings written"
        );

        stats.push(TargetStats {
            table: target.table.to_string(),
            embedded: embeddings.len(),
            skipped: blank.len(),
        });
    }

    tx.commit()?;

    Ok(BackfillStats {
        targets: stats,
        duration_ms: start.elapsed().as_millis(),
    })
}

pub fn embedding_status(store: &SqlStore, targets: &[BackfillTarget]) -> Result<Vec<EmbeddingStatus>> {
    let conn = store.connect()?;
    targets
        .iter()
        .map(|target| {
            let (rows, embedded) = conn.query_row(
                &format!(
                    "SELECT COUNT(*), COUNT({}) FROM {}",
                    target.embedding_column, target.table
                ),
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;
            Ok(EmbeddingStatus {
                table: target.table.to_string(),
                rows,
                embedded,
            })
        })
        .collect()
}
