//! Pretrained sentence embeddings (all-MiniLM-L6-v2) via fastembed
//!
//! Inference runs through ONNX runtime's default CPU execution provider; no
//! accelerator execution providers are compiled in, so device placement can
//! never pick a missing GPU.

use std::path::Path;
use std::sync::Mutex;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use super::embedding::{Embedder, EMBEDDING_DIM};
use crate::core::error::{QueryError, Result};

pub struct MiniLmEmbedder {
    model: Mutex<TextEmbedding>,
}

impl MiniLmEmbedder {
    /// Load the model, downloading it into `cache_dir` on first use
    pub fn load(cache_dir: Option<&Path>) -> Result<Self> {
        let mut options =
            InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(false);
        if let Some(dir) = cache_dir {
            options = options.with_cache_dir(dir.to_path_buf());
        }

        let model = TextEmbedding::try_new(options)
            .map_err(|e| QueryError::Embedding(format!("failed to load all-MiniLM-L6-v2: {}", e)))?;

        tracing::info!("Loaded all-MiniLM-L6-v2 embedding model");

        Ok(Self {
            model: Mutex::new(model),
        })
    }

    fn check_texts(texts: &[&str]) -> Result<()> {
        if texts.iter().any(|t| t.trim().is_empty()) {
            return Err(QueryError::Embedding("cannot embed empty text".to_string()));
        }
        Ok(())
    }

    fn run(&self, texts: Vec<&str>) -> Result<Vec<Vec<f32>>> {
        let mut model = self
            .model
            .lock()
            .map_err(|_| QueryError::Embedding("embedding model lock poisoned".to_string()))?;
        model
            .embed(texts, None)
            .map_err(|e| QueryError::Embedding(e.to_string()))
    }
}

impl Embedder for MiniLmEmbedder {
    fn dimension(&self) -> usize {
        EMBEDDING_DIM
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Self::check_texts(&[text])?;
        self.run(vec![text])?
            .into_iter()
            .next()
            .ok_or_else(|| QueryError::Embedding("model returned no embedding".to_string()))
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Self::check_texts(texts)?;
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.run(texts.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::embedding::cosine_similarity;

    // Downloads the model on first run
    #[test]
    #[ignore]
    fn test_same_text_embeds_identically() {
        let model = MiniLmEmbedder::load(None).unwrap();
        let a = model.embed("wireless noise cancelling headphones").unwrap();
        let b = model.embed("wireless noise cancelling headphones").unwrap();

        assert_eq!(a.len(), EMBEDDING_DIM);
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-5);
    }

    #[test]
    #[ignore]
    fn test_related_words_rank_closer() {
        let model = MiniLmEmbedder::load(None).unwrap();
        let query = model.embed("earbuds").unwrap();
        let near = model.embed("Noise cancelling headphones").unwrap();
        let far = model.embed("Office chair").unwrap();

        assert!(cosine_similarity(&query, &near) > cosine_similarity(&query, &far));
    }

    #[test]
    fn test_empty_text_rejected_before_inference() {
        // No model needed: emptiness is checked up front
        assert!(matches!(
            MiniLmEmbedder::check_texts(&["ok", "  "]),
            Err(QueryError::Embedding(_))
        ));
        assert!(MiniLmEmbedder::check_texts(&["ok"]).is_ok());
    }
}
