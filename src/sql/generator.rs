//! Natural language to SQL
//!
//! Callers depend only on [`SqlGenerator`]. The current implementation,
//! [`PromptedSqlGenerator`], asks a free-text [`LanguageModel`] for a query
//! and pulls the statement out of whatever text comes back. A
//! structured-output backend can replace it behind the same trait.

use lazy_static::lazy_static;
use regex::Regex;

use crate::core::error::{QueryError, Result};

lazy_static! {
    // ASCII-only case folding: `ſ` (U+017F) must not match `s`
    static ref SELECT_RE: Regex = Regex::new(r"(?i-u)select").unwrap();
}

/// Opaque text-in, text-out generative model
pub trait LanguageModel {
    fn generate_text(&self, prompt: &str) -> Result<String>;
}

/// Turns a question plus schema description into one SQL statement
pub trait SqlGenerator {
    fn generate(&self, question: &str, schema: &str) -> Result<String>;
}

pub struct PromptedSqlGenerator<M> {
    model: M,
}

impl<M: LanguageModel> PromptedSqlGenerator<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }
}

impl<M: LanguageModel> SqlGenerator for PromptedSqlGenerator<M> {
    fn generate(&self, question: &str, schema: &str) -> Result<String> {
        let prompt = build_prompt(question, schema);
        let raw = self.model.generate_text(&prompt)?;

        if raw.trim().is_empty() {
            return Err(QueryError::Generation(
                "empty response from model".to_string(),
            ));
        }

        let sql = extract_sql(&raw);
        tracing::debug!(%sql, "generated SQL");
        Ok(sql)
    }
}

pub fn build_prompt(question: &str, schema: &str) -> String {
    format!(
        "
You are an expert SQLite SQL generator.

Rules:
- Use ONLY the schema below
- Generate ONLY a SELECT query
- No explanations
- No markdown
- No comments

Schema:
{schema}

Question:
{question}
"
    )
}

/// Drop everything before the first case-insensitive `select`.
///
/// Without a match the trimmed text is returned as is; the safety check
/// rejects it downstream.
pub fn extract_sql(raw: &str) -> String {
    let text = raw.trim();
    match SELECT_RE.find(text) {
        Some(m) => text[m.start()..].trim().to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::guard::is_safe;
    use std::cell::RefCell;

    /// Replays a canned response and records the prompt
    struct CannedModel {
        response: String,
        prompts: RefCell<Vec<String>>,
    }

    impl CannedModel {
        fn new(response: &str) -> Self {
            Self {
                response: response.to_string(),
                prompts: RefCell::new(Vec::new()),
            }
        }
    }

    impl LanguageModel for &CannedModel {
        fn generate_text(&self, prompt: &str) -> Result<String> {
            self.prompts.borrow_mut().push(prompt.to_string());
            Ok(self.response.clone())
        }
    }

    #[test]
    fn test_extract_strips_leading_prose() {
        let raw = "Sure! Here is the query:\nSELECT name FROM products WHERE price < 100";
        assert_eq!(
            extract_sql(raw),
            "SELECT name FROM products WHERE price < 100"
        );
    }

    #[test]
    fn test_extract_strips_opening_fence_only() {
        let raw = "```sql\nselect id from orders\n```";
        assert_eq!(extract_sql(raw), "select id from orders\n```");
    }

    #[test]
    fn test_extract_uses_first_occurrence() {
        let raw = "I will Select carefully. SELECT 1";
        assert_eq!(extract_sql(raw), "Select carefully. SELECT 1");
    }

    #[test]
    fn test_extract_matches_truncation_property() {
        let cases = [
            "  sElEcT * FROM t  ",
            "prefix\u{00e9} SELECT x",
            "-- comment\nSELECT a, b FROM c",
        ];
        for raw in cases {
            let trimmed = raw.trim();
            let idx = trimmed.to_ascii_lowercase().find("select").unwrap();
            assert_eq!(extract_sql(raw), trimmed[idx..].trim());
        }
    }

    #[test]
    fn test_extract_ignores_unicode_case_variants() {
        let raw = "\u{017F}elect is not select: SELECT 1";
        assert_eq!(extract_sql(raw), "select: SELECT 1");
    }

    #[test]
    fn test_extract_without_select_is_unsafe() {
        for raw in ["DROP TABLE products", "I cannot answer that.", "UPDATE x SET y = 1"] {
            let sql = extract_sql(raw);
            assert_eq!(sql, raw);
            assert!(!is_safe(&sql));
        }
    }

    #[test]
    fn test_prompt_contains_rules_schema_and_question() {
        let prompt = build_prompt("cheapest product?", "products(id, name, price)");
        assert!(prompt.contains("Generate ONLY a SELECT query"));
        assert!(prompt.contains("No markdown"));
        assert!(prompt.contains("No explanations"));
        assert!(prompt.contains("products(id, name, price)"));
        assert!(prompt.contains("Question:\ncheapest product?"));
    }

    #[test]
    fn test_generate_sends_prompt_and_extracts() {
        let model = CannedModel::new("Answer:\nSELECT name FROM products ORDER BY price LIMIT 1");
        let generator = PromptedSqlGenerator::new(&model);

        let sql = generator.generate("cheapest product?", "SCHEMA").unwrap();
        assert_eq!(sql, "SELECT name FROM products ORDER BY price LIMIT 1");

        let prompts = model.prompts.borrow();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("SCHEMA"));
        assert!(prompts[0].contains("cheapest product?"));
    }

    #[test]
    fn test_empty_response_is_generation_error() {
        for response in ["", "  \n "] {
            let model = CannedModel::new(response);
            let generator = PromptedSqlGenerator::new(&model);
            assert!(matches!(
                generator.generate("q", "s"),
                Err(QueryError::Generation(_))
            ));
        }
    }
}
