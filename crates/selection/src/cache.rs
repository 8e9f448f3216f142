//! Exact-text embedding cache.
//!
//! Append-only for the lifetime of the cache: there is no eviction, so a
//! long-running service that feeds it unbounded distinct texts should wrap
//! it with its own bounding policy.

use std::collections::HashMap;
use std::sync::RwLock;

use promptrelay_core::gateway::EmbeddingVector;

/// Text → embedding map shared (via `Arc`) between matchers.
///
/// Reads take a shared lock; inserts take the write lock briefly and keep
/// the first vector stored for a key.
#[derive(Debug, Default)]
pub struct EmbeddingCache {
    entries: RwLock<HashMap<String, EmbeddingVector>>,
}

impl EmbeddingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a vector by exact text.
    pub fn get(&self, text: &str) -> Option<EmbeddingVector> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(text).cloned()
    }

    /// Store a vector for `text` unless one is already present, and return
    /// whichever vector the cache now holds for that key.
    pub fn insert(&self, text: &str, embedding: EmbeddingVector) -> EmbeddingVector {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries
            .entry(text.to_string())
            .or_insert(embedding)
            .clone()
    }

    pub fn contains(&self, text: &str) -> bool {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.contains_key(text)
    }

    /// Number of cached texts.
    pub fn len(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
