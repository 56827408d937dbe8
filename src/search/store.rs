//! Relational store accessor over SQLite
//!
//! Every call opens its own connection and drops it before returning, on the
//! error path too. Only [`SqlStore::init_schema`] may create the database
//! file; every other call fails on a missing file. `execute` runs exactly one
//! statement and refuses SQL text with a second statement after it.
//!
//! Each connection gets two scalar functions that give SQLite a vector type:
//! - `vector(x)`: cast a bracketed literal (or packed BLOB) to a packed vector
//! - `l2_distance(a, b)`: Euclidean distance, NULL if either side is NULL

use std::path::{Path, PathBuf};

use rusqlite::functions::{Context, FunctionFlags};
use rusqlite::types::ValueRef;
use rusqlite::{params_from_iter, Batch, Connection, OpenFlags};

use super::vector::{blob_to_vector, l2_distance, parse_vector_literal, vector_to_blob, VectorError};
use crate::core::error::{QueryError, Result};
use crate::core::schema::{CREATE_TABLES_SQL, SEED_SQL};
use crate::core::value::{ResultSet, Value};

/// Handle to a SQLite database file. Holds no open connection.
#[derive(Debug, Clone)]
pub struct SqlStore {
    path: PathBuf,
}

impl SqlStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open an existing database with the vector functions registered
    pub fn connect(&self) -> Result<Connection> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(&self.path, flags)?;
        register_vector_functions(&conn)?;
        Ok(conn)
    }

    /// Like `connect`, but creates the file when missing
    fn connect_or_create(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)?;
        register_vector_functions(&conn)?;
        Ok(conn)
    }

    /// Execute exactly one statement with positional parameters
    pub fn execute(&self, sql: &str, params: &[Value]) -> Result<ResultSet> {
        let conn = self.connect()?;
        let mut batch = Batch::new(&conn, sql);
        let mut stmt = batch
            .next()?
            .ok_or_else(|| QueryError::InvalidArgument("no SQL statement to execute".to_string()))?;
        if batch.next()?.is_some() {
            return Err(QueryError::InvalidArgument(
                "SQL text holds more than one statement".to_string(),
            ));
        }

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let mut rows = stmt.query(params_from_iter(params.iter()))?;
        let mut collected = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(width);
            for idx in 0..width {
                values.push(row.get::<_, Value>(idx)?);
            }
            collected.push(values);
        }

        tracing::debug!(rows = collected.len(), "statement executed");

        Ok(ResultSet {
            columns,
            rows: collected,
        })
    }

    /// Create the demo tables if missing. Returns true when seed rows were added.
    pub fn init_schema(&self, seed: bool) -> Result<bool> {
        let conn = self.connect_or_create()?;
        for ddl in CREATE_TABLES_SQL {
            conn.execute_batch(ddl)?;
        }

        if !seed {
            return Ok(false);
        }

        let existing: i64 = conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
        if existing > 0 {
            return Ok(false);
        }

        conn.execute_batch(&format!("BEGIN;\n{}\nCOMMIT;", SEED_SQL))?;
        Ok(true)
    }
}

fn register_vector_functions(conn: &Connection) -> rusqlite::Result<()> {
    let flags = FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC;

    conn.create_scalar_function("vector", 1, flags, |ctx| {
        Ok(vector_arg(ctx, 0)?.map(|v| vector_to_blob(&v)))
    })?;

    conn.create_scalar_function("l2_distance", 2, flags, |ctx| {
        let (Some(a), Some(b)) = (vector_arg(ctx, 0)?, vector_arg(ctx, 1)?) else {
            return Ok(None);
        };
        l2_distance(&a, &b).map(Some).map_err(user_error)
    })?;

    Ok(())
}

/// Read a function argument as a vector: packed BLOB or bracketed literal
fn vector_arg(ctx: &Context<'_>, idx: usize) -> rusqlite::Result<Option<Vec<f32>>> {
    match ctx.get_raw(idx) {
        ValueRef::Null => Ok(None),
        ValueRef::Blob(blob) => blob_to_vector(blob)
            .filter(|v| !v.is_empty())
            .map(Some)
            .ok_or_else(|| user_error(VectorError::Malformed(format!("{} byte blob", blob.len())))),
        ValueRef::Text(text) => {
            let literal = String::from_utf8_lossy(text);
            parse_vector_literal(&literal).map(Some).map_err(user_error)
        }
        other => Err(user_error(VectorError::Malformed(format!(
            "cannot cast {:?} to vector",
            other.data_type()
        )))),
    }
}

fn user_error(err: VectorError) -> rusqlite::Error {
    rusqlite::Error::UserFunctionError(Box::new(err))
}
