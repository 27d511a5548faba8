//! Text embedders
//!
//! [`FastEmbedder`] runs a local sentence-embedding model and is what the tool
//! server uses by default. [`HashingEmbedder`] needs no model files; it backs
//! tests and offline runs.

/// Embedding failure, e.g. a model that could not be loaded or run
#[derive(Debug, Clone, thiserror::Error)]
#[error("Embedding failed: {0}")]
pub struct EmbedError(pub String);

/// Turns text into a fixed-length vector
pub trait Embedder: Send + Sync {
    fn dimension(&self) -> usize;

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError>;

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        texts.iter().map(|t| self.embed(t)).collect()
    }
}

/// Default vector width for [`HashingEmbedder`]
pub const DEFAULT_DIMENSION: usize = 256;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

pub(crate) fn fnv1a64(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME)
    })
}

/// Lowercased alphanumeric tokens; very short tokens are dropped
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 1)
        .map(str::to_lowercase)
        .collect()
}

/// Feature-hashing bag-of-words embedder.
///
/// Each token and each adjacent token pair lands in a signed bucket chosen by
/// its FNV-1a hash; the result is L2-normalized. Needs no model files, which
/// keeps lookups deterministic.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn add_feature(&self, vector: &mut [f32], feature: &str, weight: f32) {
        let hash = fnv1a64(feature.as_bytes());
        let bucket = (hash % self.dimension as u64) as usize;
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign * weight;
    }
}

impl Embedder for HashingEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        Ok(self.vector(text))
    }
}

impl HashingEmbedder {
    /// Infallible form of [`Embedder::embed`]
    pub fn vector(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; self.dimension];
        let tokens = tokenize(text);

        for token in &tokens {
            self.add_feature(&mut vector, token, 1.0);
        }
        for pair in tokens.windows(2) {
            self.add_feature(&mut vector, &format!("{} {}", pair[0], pair[1]), 0.5);
        }

        normalize(&mut vector);
        vector
    }
}

#[cfg(feature = "fastembed")]
pub use self::fastembed_backend::{FastEmbedder, MINILM_DIMENSION};

#[cfg(feature = "fastembed")]
mod fastembed_backend {
    use std::path::PathBuf;

    use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
    use parking_lot::Mutex;

    use super::{EmbedError, Embedder};

    /// Output width of all-MiniLM-L6-v2
    pub const MINILM_DIMENSION: usize = 384;

    const BATCH_SIZE: usize = 32;

    /// all-MiniLM-L6-v2 sentence embeddings via fastembed (ONNX, CPU).
    ///
    /// The model is downloaded into `cache_dir` on first use. Embedding is
    /// CPU-bound; async callers should run it under `spawn_blocking`.
    pub struct FastEmbedder {
        model: Mutex<TextEmbedding>,
    }

    impl FastEmbedder {
        pub fn new(cache_dir: Option<PathBuf>) -> Result<Self, EmbedError> {
            let mut options = InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(false);
            if let Some(dir) = cache_dir {
                options = options.with_cache_dir(dir);
            }

            let model = TextEmbedding::try_new(options)
                .map_err(|e| EmbedError(format!("loading all-MiniLM-L6-v2: {}", e)))?;
            Ok(Self {
                model: Mutex::new(model),
            })
        }
    }

    impl Embedder for FastEmbedder {
        fn dimension(&self) -> usize {
            MINILM_DIMENSION
        }

        fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
            self.embed_batch(&[text.to_string()])?
                .into_iter()
                .next()
                .ok_or_else(|| EmbedError("model returned no embedding".to_string()))
        }

        fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
            if texts.is_empty() {
                return Ok(Vec::new());
            }
            let mut model = self.model.lock();
            model
                .embed(texts.to_vec(), Some(BATCH_SIZE))
                .map_err(|e| EmbedError(e.to_string()))
        }
    }

}

fn normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
}

/// Compute cosine similarity between two vectors.
/// Returns 0.0 when lengths differ or either vector has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("What is EBITDA, again?"), vec!["what", "is", "ebitda", "again"]);
        assert!(tokenize("a - b").is_empty());
    }

    #[test]
    fn test_embedding_is_deterministic_and_normalized() {
        let embedder = HashingEmbedder::new(64);
        let a = embedder.vector("gross margin");
        let b = embedder.vector("gross margin");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);

        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "expected unit norm, got {norm}");
    }

    #[test]
    fn test_empty_text_embeds_to_zero() {
        let embedder = HashingEmbedder::default();
        let v = embedder.vector("?!");
        assert!(v.iter().all(|x| *x == 0.0));
        assert_eq!(cosine_similarity(&v, &embedder.vector("margin")), 0.0);
    }

    #[test]
    fn test_shared_words_score_higher() {
        let embedder = HashingEmbedder::default();
        let query = embedder.vector("net present value");
        let related = embedder.vector("net present value of future cash flows");
        let unrelated = embedder.vector("inventory turnover ratio");
        assert!(cosine_similarity(&query, &related) > cosine_similarity(&query, &unrelated));
    }

    #[test]
    fn test_cosine_similarity_bounds() {
        let a = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&a, &[1.0, 2.0]), 0.0);
        let neg: Vec<f32> = a.iter().map(|x| -x).collect();
        assert!((cosine_similarity(&a, &neg) + 1.0).abs() < 1e-6);
    }
}
