//! NL to SQL: generation, extraction and the read-only check

pub mod gemini;
pub mod generator;
pub mod guard;

pub use gemini::GeminiClient;
pub use generator::{extract_sql, LanguageModel, PromptedSqlGenerator, SqlGenerator};
pub use guard::{ensure_safe, is_safe};
