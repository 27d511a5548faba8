//! Business glossary retrieval
//!
//! Terms are embedded into an in-memory vector store and ranked by cosine
//! similarity. Until a glossary is loaded, queries run against a small
//! built-in dataset instead.
//!
//! Embedding may be CPU-heavy, so request handlers call into a `Glossary`
//! from `spawn_blocking`.

mod embed;
mod fallback;
mod store;

pub use embed::{cosine_similarity, tokenize, EmbedError, Embedder, HashingEmbedder, DEFAULT_DIMENSION};
#[cfg(feature = "fastembed")]
pub use embed::{FastEmbedder, MINILM_DIMENSION};
pub(crate) use embed::fnv1a64;
pub use fallback::fallback_entries;
pub use store::{GlossaryEntry, ScoredTerm, VectorStore};

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

/// Results returned when the caller does not ask for a count
pub const DEFAULT_TOP_K: usize = 3;

/// Errors loading a glossary file
#[derive(Debug, thiserror::Error)]
pub enum GlossaryError {
    #[error("Failed to read glossary {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse glossary {path}: {message}")]
    Parse { path: String, message: String },

    #[error(transparent)]
    Embed(#[from] EmbedError),
}

/// Which dataset answered a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuerySource {
    Index,
    Fallback,
}

/// Ranked hits for one query
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    pub results: Vec<ScoredTerm>,
    pub source: QuerySource,
}

/// Glossary lookup over an embedder and a vector store
pub struct Glossary {
    embedder: Arc<dyn Embedder>,
    store: VectorStore,
    fallback: Vec<(GlossaryEntry, Vec<f32>)>,
}

impl Default for Glossary {
    /// Offline glossary over [`HashingEmbedder`]
    fn default() -> Self {
        let embedder = HashingEmbedder::default();
        let fallback = fallback_entries()
            .into_iter()
            .map(|entry| {
                let vector = embedder.vector(&entry.document());
                (entry, vector)
            })
            .collect();
        Self {
            embedder: Arc::new(embedder),
            store: VectorStore::new(),
            fallback,
        }
    }
}

impl Glossary {
    /// Create an empty glossary; queries use the fallback dataset until entries are indexed
    pub fn new(embedder: Arc<dyn Embedder>) -> Result<Self, GlossaryError> {
        let entries = fallback_entries();
        let documents: Vec<String> = entries.iter().map(GlossaryEntry::document).collect();
        let vectors = embedder.embed_batch(&documents)?;
        Ok(Self {
            embedder,
            store: VectorStore::new(),
            fallback: entries.into_iter().zip(vectors).collect(),
        })
    }

    /// Embed and store entries, skipping blank ones. Returns how many were added.
    pub fn index(&self, entries: impl IntoIterator<Item = GlossaryEntry>) -> Result<usize, GlossaryError> {
        let entries: Vec<GlossaryEntry> = entries
            .into_iter()
            .filter(|entry| {
                let blank = entry.term.trim().is_empty() || entry.definition.trim().is_empty();
                if blank {
                    tracing::warn!(term = %entry.term, "skipping glossary entry with empty term or definition");
                }
                !blank
            })
            .collect();

        let documents: Vec<String> = entries.iter().map(GlossaryEntry::document).collect();
        let vectors = self.embedder.embed_batch(&documents)?;
        let added = entries.len();
        for (entry, vector) in entries.into_iter().zip(vectors) {
            self.store.add(entry, vector);
        }
        Ok(added)
    }

    /// Index a YAML list of `{term, definition}` records
    pub fn load_yaml(&self, path: impl AsRef<Path>) -> Result<usize, GlossaryError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| GlossaryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let entries: Vec<GlossaryEntry> = serde_yaml::from_str(&content).map_err(|e| GlossaryError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let added = self.index(entries)?;
        tracing::info!(path = %path.display(), terms = added, "loaded glossary");
        Ok(added)
    }

    /// Number of indexed entries, not counting the fallback dataset
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Rank entries for `text`, best first, at most `top_k`
    pub fn query(&self, text: &str, top_k: usize) -> Result<QueryResult, GlossaryError> {
        let query = self.embedder.embed(text)?;

        if self.store.is_empty() {
            let scored = self
                .fallback
                .iter()
                .map(|(entry, vector)| (cosine_similarity(vector, &query), entry));
            return Ok(QueryResult {
                results: store::rank(scored, top_k),
                source: QuerySource::Fallback,
            });
        }

        Ok(QueryResult {
            results: self.store.search(&query, top_k),
            source: QuerySource::Index,
        })
    }
}
