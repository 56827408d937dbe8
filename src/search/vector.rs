//! Vector wire formats and distance
//!
//! Two encodings are used for embedding vectors:
//! - the bracketed literal `[0.1,0.2,0.3]`, which is what the `vector(?)`
//!   cast in SQL accepts as a bound parameter
//! - packed little-endian `f32` BLOBs, which is how vector columns are stored

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum VectorError {
    #[error("malformed vector literal: {0}")]
    Malformed(String),

    #[error("vector must have at least one dimension")]
    Empty,

    #[error("vector dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },
}

/// Serialize a vector into the bracketed literal accepted by `vector(?)`
pub fn to_vector_literal(vector: &[f32]) -> String {
    let parts: Vec<String> = vector.iter().map(|v| v.to_string()).collect();
    format!("[{}]", parts.join(","))
}

/// Parse a bracketed literal such as `[1, 2.5, -3e-2]`
pub fn parse_vector_literal(literal: &str) -> Result<Vec<f32>, VectorError> {
    let inner = literal
        .trim()
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| VectorError::Malformed(literal.to_string()))?;

    if inner.trim().is_empty() {
        return Err(VectorError::Empty);
    }

    inner
        .split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| VectorError::Malformed(format!("bad element '{}'", part)))
        })
        .collect()
}

/// Convert f32 vector to BLOB
pub fn vector_to_blob(vector: &[f32]) -> Vec<u8> {
    let mut blob = Vec::with_capacity(vector.len() * 4);
    for &val in vector {
        blob.extend_from_slice(&val.to_le_bytes());
    }
    blob
}

/// Convert BLOB to f32 vector
///
/// Returns `None` when the length is not a whole number of `f32`s.
pub fn blob_to_vector(blob: &[u8]) -> Option<Vec<f32>> {
    if blob.len() % 4 != 0 {
        return None;
    }
    Some(
        blob.chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect(),
    )
}

/// Euclidean distance, the metric behind `l2_distance` in SQL
pub fn l2_distance(a: &[f32], b: &[f32]) -> Result<f64, VectorError> {
    if a.len() != b.len() {
        return Err(VectorError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let sum: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = (*x as f64) - (*y as f64);
            d * d
        })
        .sum();

    Ok(sum.sqrt())
}
