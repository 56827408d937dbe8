//! Text embedding providers
//!
//! [`Embedder`] is the seam the search and backfill code depend on. Two
//! providers exist:
//! - `MiniLmEmbedder` (feature `minilm`, default): pretrained
//!   all-MiniLM-L6-v2, the configured default provider.
//! - [`HarmonicEmbedder`]: Harmonic Token Projection (HTP), a deterministic,
//!   training-free projection of Unicode tokens onto unit circles
//!   (<https://arxiv.org/html/2511.20665>). Always available, CPU only, no
//!   model download. Lexical rather than semantic.
//!
//! Both produce 384-dimensional, L2-normalized vectors.

use std::f64::consts::PI;

use crate::core::config::{EmbeddingConfig, EmbeddingProvider};
use crate::core::error::{QueryError, Result};

/// Embedding dimension (2 * number of coprime moduli)
pub const EMBEDDING_DIM: usize = 384;

/// Number of coprime moduli for harmonic projection
const NUM_MODULI: usize = EMBEDDING_DIM / 2;

/// Maximum token length (Unicode code points)
const MAX_TOKEN_LENGTH: usize = 64;

/// First NUM_MODULI primes, coprime by construction
static COPRIME_MODULI: &[u64] = &[
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71,
    73, 79, 83, 89, 97, 101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151,
    157, 163, 167, 173, 179, 181, 191, 193, 197, 199, 211, 223, 227, 229, 233,
    239, 241, 251, 257, 263, 269, 271, 277, 281, 283, 293, 307, 311, 313, 317,
    331, 337, 347, 349, 353, 359, 367, 373, 379, 383, 389, 397, 401, 409, 419,
    421, 431, 433, 439, 443, 449, 457, 461, 463, 467, 479, 487, 491, 499, 503,
    509, 521, 523, 541, 547, 557, 563, 569, 571, 577, 587, 593, 599, 601, 607,
    613, 617, 619, 631, 641, 643, 647, 653, 659, 661, 673, 677, 683, 691, 701,
    709, 719, 727, 733, 739, 743, 751, 757, 761, 769, 773, 787, 797, 809, 811,
    821, 823, 827, 829, 839, 853, 857, 859, 863, 877, 881, 883, 887, 907, 911,
    919, 929, 937, 941, 947, 953, 967, 971, 977, 983, 991, 997, 1009, 1013,
    1019, 1021, 1031, 1033, 1039, 1049, 1051, 1061, 1063, 1069, 1087, 1091,
    1093, 1097, 1103, 1109, 1117, 1123, 1129, 1151, 1153, 1163, 1171, 1181,
];

/// Maps text to a fixed-length vector.
///
/// Implementations must be deterministic for a fixed model and input, and
/// must reject empty input.
pub trait Embedder {
    fn dimension(&self) -> usize;

    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }
}

/// Build the provider selected in config
pub fn load_embedder(config: &EmbeddingConfig) -> Result<Box<dyn Embedder>> {
    match config.provider {
        EmbeddingProvider::Harmonic => Ok(Box::new(HarmonicEmbedder::new())),
        #[cfg(feature = "minilm")]
        EmbeddingProvider::Minilm => Ok(Box::new(super::minilm::MiniLmEmbedder::load(
            config.cache_dir.as_deref(),
        )?)),
        #[cfg(not(feature = "minilm"))]
        EmbeddingProvider::Minilm => Err(QueryError::Embedding(
            "the minilm provider requires building with `--features minilm`".to_string(),
        )),
    }
}

/// Harmonic Token Projection embedder
pub struct HarmonicEmbedder {
    moduli: Vec<u64>,
}

impl HarmonicEmbedder {
    pub fn new() -> Self {
        Self {
            moduli: COPRIME_MODULI[..NUM_MODULI].to_vec(),
        }
    }

    /// Embed a single token
    ///
    /// Steps:
    /// 1. Encode the token's code points as a base-2^16 integer N
    /// 2. For each modulus m_i, compute r_i = N mod m_i
    /// 3. Project to unit circle: E_i = [sin(2πr_i/m_i), cos(2πr_i/m_i)]
    fn embed_token(&self, token: &str) -> Vec<f64> {
        let n = token_to_integer(token);

        let mut embedding = Vec::with_capacity(EMBEDDING_DIM);
        for &m in &self.moduli {
            let r = n % m;
            let theta = 2.0 * PI * (r as f64) / (m as f64);
            embedding.push(theta.sin());
            embedding.push(theta.cos());
        }
        embedding
    }
}

impl Default for HarmonicEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl Embedder for HarmonicEmbedder {
    fn dimension(&self) -> usize {
        EMBEDDING_DIM
    }

    /// Mean-pool token projections, then L2 normalize
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return Err(QueryError::Embedding(format!(
                "no embeddable tokens in input {:?}",
                text
            )));
        }

        let mut sum = vec![0.0f64; EMBEDDING_DIM];
        for token in &tokens {
            for (acc, val) in sum.iter_mut().zip(self.embed_token(token)) {
                *acc += val;
            }
        }

        let count = tokens.len() as f64;
        for val in &mut sum {
            *val /= count;
        }

        let norm: f64 = sum.iter().map(|x| x * x).sum::<f64>().sqrt();
        let embedding = if norm > 0.0 {
            sum.iter().map(|x| (*x / norm) as f32).collect()
        } else {
            sum.iter().map(|x| *x as f32).collect()
        };

        Ok(embedding)
    }
}

/// N = Σ u_j * B^(L-j) where B = 2^16, wrapping on overflow
fn token_to_integer(token: &str) -> u64 {
    token
        .chars()
        .take(MAX_TOKEN_LENGTH)
        .fold(0u64, |n, c| n.wrapping_mul(65536).wrapping_add(c as u64))
}

/// Lowercased words, split on whitespace and ASCII punctuation
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_lowercase())
        .collect()
}

/// Cosine similarity between two embeddings
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a > 0.0 && norm_b > 0.0 {
        dot / (norm_a * norm_b)
    } else {
        0.0
    }
}
