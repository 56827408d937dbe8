//! Typed query values and tabular results

use std::fmt;

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, Value as SqlValue, ValueRef};
use serde::Serialize;

use crate::search::vector::{blob_to_vector, vector_to_blob};

/// Leading elements shown when a vector is displayed
const VECTOR_PREVIEW: usize = 3;

/// A single cell of a result row, or a bound statement parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Vector(Vec<f32>),
    /// BLOB that is not a whole number of `f32`s
    Blob(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Real(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<Vec<f32>> for Value {
    fn from(v: Vec<f32>) -> Self {
        Value::Vector(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", r),
            Value::Text(s) => write!(f, "{}", s),
            Value::Vector(v) => {
                let preview: Vec<String> = v
                    .iter()
                    .take(VECTOR_PREVIEW)
                    .map(|x| format!("{:.4}", x))
                    .collect();
                if v.len() > VECTOR_PREVIEW {
                    write!(f, "[{}, …] ({} dims)", preview.join(", "), v.len())
                } else {
                    write!(f, "[{}]", preview.join(", "))
                }
            }
            Value::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(SqlValue::Null),
            Value::Integer(i) => ToSqlOutput::Owned(SqlValue::Integer(*i)),
            Value::Real(r) => ToSqlOutput::Owned(SqlValue::Real(*r)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Vector(v) => ToSqlOutput::Owned(SqlValue::Blob(vector_to_blob(v))),
            Value::Blob(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
        })
    }
}

impl FromSql for Value {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Ok(match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(r) => Value::Real(r),
            ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => match blob_to_vector(b) {
                Some(v) if !v.is_empty() => Value::Vector(v),
                _ => Value::Blob(b.to_vec()),
            },
        })
    }
}

/// Rows returned by one statement, with their column names.
///
/// Every row holds exactly `columns.len()` values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All values of one column, in row order
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Integer(7).to_string(), "7");
        assert_eq!(Value::from("desk").to_string(), "desk");
        assert_eq!(
            Value::Vector(vec![0.5, 0.25, 0.0, 1.0]).to_string(),
            "[0.5000, 0.2500, 0.0000, …] (4 dims)"
        );
        assert_eq!(Value::Vector(vec![1.0]).to_string(), "[1.0000]");
    }

    #[test]
    fn test_json_is_untagged() {
        let row = vec![
            Value::Integer(1),
            Value::from("lamp"),
            Value::Real(19.5),
            Value::Null,
        ];
        assert_eq!(
            serde_json::to_string(&row).unwrap(),
            r#"[1,"lamp",19.5,null]"#
        );
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<f64>), Value::Null);
        assert_eq!(Value::from(Some(500.0)), Value::Real(500.0));
    }

    #[test]
    fn test_blob_decoding() {
        let packed = vector_to_blob(&[1.0, 2.0]);
        assert_eq!(
            Value::column_result(ValueRef::Blob(&packed)).unwrap(),
            Value::Vector(vec![1.0, 2.0])
        );
        assert_eq!(
            Value::column_result(ValueRef::Blob(&[])).unwrap(),
            Value::Blob(Vec::new())
        );
        assert_eq!(
            Value::column_result(ValueRef::Blob(&[1, 2, 3])).unwrap(),
            Value::Blob(vec![1, 2, 3])
        );
    }

    #[test]
    fn test_column_lookup() {
        let rs = ResultSet {
            columns: vec!["id".into(), "name".into()],
            rows: vec![
                vec![Value::Integer(1), Value::from("a")],
                vec![Value::Integer(2), Value::from("b")],
            ],
        };
        assert_eq!(rs.len(), 2);
        assert_eq!(rs.column_index("name"), Some(1));
        assert_eq!(
            rs.column("id").unwrap(),
            vec![&Value::Integer(1), &Value::Integer(2)]
        );
        assert!(rs.column("price").is_none());
    }
}
