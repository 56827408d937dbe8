//! Read-only statement check
//!
//! This is a prefix check, not a parser. Nothing after the leading `select`
//! is inspected: side effects hidden inside the statement, or a second
//! statement after a `;`, pass the check.

use crate::core::error::{QueryError, Result};

/// True iff the trimmed, lowercased statement starts with `select`
pub fn is_safe(sql: &str) -> bool {
    sql.trim().to_lowercase().starts_with("select")
}

pub fn ensure_safe(sql: &str) -> Result<()> {
    if is_safe(sql) {
        Ok(())
    } else {
        tracing::warn!(sql, "rejected non-SELECT statement");
        Err(QueryError::UnsafeStatement(sql.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_accepted() {
        assert!(is_safe("SELECT * FROM products"));
        assert!(is_safe("  select id from orders "));
        assert!(is_safe("\n\tSeLeCt 1"));
    }

    #[test]
    fn test_non_select_rejected() {
        assert!(!is_safe("DROP TABLE products"));
        assert!(!is_safe("delete from orders"));
        assert!(!is_safe("WITH x AS (SELECT 1) SELECT * FROM x"));
        assert!(!is_safe("```sql\nSELECT 1\n```"));
        assert!(!is_safe(""));
        assert!(!is_safe("   "));
    }

    #[test]
    fn test_prefix_only() {
        // Known gap: anything after the leading SELECT is not inspected
        assert!(is_safe("SELECT 1; DROP TABLE products"));
        assert!(is_safe("selection"));
    }

    #[test]
    fn test_ensure_safe_carries_statement() {
        assert!(ensure_safe("select 1").is_ok());
        match ensure_safe("UPDATE products SET price = 0") {
            Err(QueryError::UnsafeStatement(sql)) => {
                assert_eq!(sql, "UPDATE products SET price = 0")
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
