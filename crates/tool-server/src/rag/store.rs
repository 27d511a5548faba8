//! In-memory vector store with cosine search

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::embed::cosine_similarity;

/// A glossary record, as written by the scraper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlossaryEntry {
    pub term: String,
    pub definition: String,
}

impl GlossaryEntry {
    pub fn new(term: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            definition: definition.into(),
        }
    }

    /// Text that gets embedded: the term, weighted twice, plus its definition
    pub fn document(&self) -> String {
        format!("{} {} {}", self.term, self.term, self.definition)
    }
}

/// A search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTerm {
    pub term: String,
    pub definition: String,
    pub score: f32,
}

#[derive(Debug, Clone)]
struct StoredVector {
    entry: GlossaryEntry,
    vector: Vec<f32>,
}

/// Entries and their embeddings
#[derive(Debug, Default)]
pub struct VectorStore {
    inner: RwLock<Vec<StoredVector>>,
}

impl VectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, entry: GlossaryEntry, vector: Vec<f32>) {
        self.inner.write().push(StoredVector { entry, vector });
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Best `top_k` entries by descending cosine similarity; non-positive scores are dropped
    pub fn search(&self, query: &[f32], top_k: usize) -> Vec<ScoredTerm> {
        let guard = self.inner.read();
        rank(
            guard
                .iter()
                .map(|stored| (cosine_similarity(&stored.vector, query), &stored.entry)),
            top_k,
        )
    }
}

/// Sort scored entries, drop non-matches and keep the best `top_k`
pub(crate) fn rank<'a>(scored: impl Iterator<Item = (f32, &'a GlossaryEntry)>, top_k: usize) -> Vec<ScoredTerm> {
    let mut hits: Vec<(f32, &GlossaryEntry)> = scored.filter(|(score, _)| *score > 0.0).collect();
    hits.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    hits.into_iter()
        .take(top_k)
        .map(|(score, entry)| ScoredTerm {
            term: entry.term.clone(),
            definition: entry.definition.clone(),
            score,
        })
        .collect()
}
