//! Runtime configuration
//!
//! Loaded once at startup from a YAML file and passed explicitly to the
//! query engine. Every field has a default, so a missing file is fine.
//! Credentials are never read from the file, only from the environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;

use super::error::{QueryError, Result};

pub const DEFAULT_CONFIG_FILE: &str = "nlq.yaml";
pub const DEFAULT_DATABASE_FILE: &str = "nl_search.db";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub database: PathBuf,
    pub generator: GeneratorConfig,
    pub embedding: EmbeddingConfig,
    pub search: SearchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE_FILE),
            generator: GeneratorConfig::default(),
            embedding: EmbeddingConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub model: String,
    pub base_url: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: "gemini-3-flash-preview".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_secs: 60,
        }
    }
}

impl GeneratorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// API key from the configured environment variable, if set and non-empty
    pub fn api_key(&self) -> Option<SecretString> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(SecretString::from)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    /// Deterministic harmonic token projection, no model files
    Harmonic,
    /// all-MiniLM-L6-v2 via fastembed (`minilm` feature, on by default)
    #[default]
    Minilm,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProvider,
    /// Where downloaded model files are cached
    pub cache_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    pub default_limit: i64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { default_limit: 10 }
    }
}

impl Config {
    /// Load from `path`. A missing file yields the defaults; a file that
    /// cannot be read or parsed is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(QueryError::Config(format!(
                    "failed to read {}: {}",
                    path.display(),
                    err
                )))
            }
        };

        Self::from_yaml(&content)
            .map_err(|e| QueryError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        // An empty document deserializes as unit, not as an empty map
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Default config path in the current directory
    pub fn default_path() -> PathBuf {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(DEFAULT_CONFIG_FILE)
    }
}
