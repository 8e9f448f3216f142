//! Embedding matcher: nearest candidates for a query text.
//!
//! Embedding calls are the expensive, rate-limited operation, so every
//! lookup goes through the shared [`EmbeddingCache`] first. A fixed prompt
//! pool is therefore embedded once per process; only new queries cost a
//! remote call.

use std::sync::Arc;

use promptrelay_core::error::GatewayError;
use promptrelay_core::gateway::{EmbeddingVector, Gateway};
use tracing::{debug, trace};

use crate::cache::EmbeddingCache;
use crate::similarity::{ScoredCandidate, rank_by_similarity};

pub struct EmbeddingMatcher {
    gateway: Arc<dyn Gateway>,
    cache: Arc<EmbeddingCache>,
}

impl EmbeddingMatcher {
    /// Create a matcher with a private cache.
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self::with_cache(gateway, Arc::new(EmbeddingCache::new()))
    }

    /// Create a matcher over an existing (possibly shared) cache.
    pub fn with_cache(gateway: Arc<dyn Gateway>, cache: Arc<EmbeddingCache>) -> Self {
        Self { gateway, cache }
    }

    pub fn cache(&self) -> &Arc<EmbeddingCache> {
        &self.cache
    }

    /// Return the embedding for `text`, calling the gateway only on a cache miss.
    ///
    /// The cache lock is not held during the remote call. Empty vectors and
    /// vectors with NaN or infinite components are rejected and never cached.
    pub async fn embed(&self, text: &str) -> Result<EmbeddingVector, GatewayError> {
        if let Some(embedding) = self.cache.get(text) {
            trace!(chars = text.len(), "Embedding cache hit");
            return Ok(embedding);
        }

        let embedding = self.gateway.embed(text).await?;
        if embedding.is_empty() {
            return Err(GatewayError::EmptyResponse(format!(
                "gateway '{}' returned an empty embedding",
                self.gateway.name()
            )));
        }
        if !embedding.iter().all(|x| x.is_finite()) {
            return Err(GatewayError::MalformedResponse(format!(
                "gateway '{}' returned a non-finite embedding component",
                self.gateway.name()
            )));
        }

        debug!(
            dimensions = embedding.len(),
            cached = self.cache.len() + 1,
            "Embedding cached"
        );
        Ok(self.cache.insert(text, EmbeddingVector::from(embedding)))
    }

    /// Score every candidate against `query`, best first.
    ///
    /// The query is embedded once; candidates are embedded in order. The
    /// first failed lookup aborts the whole ranking.
    pub async fn rank<S: AsRef<str>>(
        &self,
        query: &str,
        candidates: &[S],
    ) -> Result<Vec<ScoredCandidate>, GatewayError> {
        let query_embedding = self.embed(query).await?;

        let mut embedded = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let candidate = candidate.as_ref();
            let embedding = self.embed(candidate).await?;
            embedded.push((candidate.to_string(), embedding));
        }

        Ok(rank_by_similarity(&query_embedding, embedded))
    }

    /// The `min(n, candidates.len())` candidates most similar to `query`,
    /// best first.
    pub async fn find_best_matches<S: AsRef<str>>(
        &self,
        query: &str,
        candidates: &[S],
        n: usize,
    ) -> Result<Vec<String>, GatewayError> {
        let mut ranked = self.rank(query, candidates).await?;
        ranked.truncate(n);
        Ok(ranked.into_iter().map(|c| c.text).collect())
    }
}
