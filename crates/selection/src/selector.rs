//! Prompt selection: pick the pool entry that best fits a message.

use std::sync::Arc;

use async_trait::async_trait;
use promptrelay_core::error::SelectionError;
use promptrelay_core::gateway::Gateway;
use tracing::debug;

use crate::cache::EmbeddingCache;
use crate::matcher::EmbeddingMatcher;

/// The capability the agent depends on.
///
/// Implementations may rank however they like (embeddings, keywords, a
/// hybrid); the agent never sees the mechanism.
#[async_trait]
pub trait PromptSelector: Send + Sync {
    /// Return the single best prompt in `pool` for `message`.
    ///
    /// Fails with [`SelectionError::NoMatch`] when `pool` is empty.
    async fn select_best_prompt(
        &self,
        pool: &[String],
        message: &str,
    ) -> Result<String, SelectionError>;
}

/// Selects by cosine similarity between the message and each prompt's
/// embedding.
pub struct EmbeddingSelector {
    matcher: EmbeddingMatcher,
}

impl EmbeddingSelector {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            matcher: EmbeddingMatcher::new(gateway),
        }
    }

    pub fn with_cache(gateway: Arc<dyn Gateway>, cache: Arc<EmbeddingCache>) -> Self {
        Self {
            matcher: EmbeddingMatcher::with_cache(gateway, cache),
        }
    }

    pub fn matcher(&self) -> &EmbeddingMatcher {
        &self.matcher
    }
}

#[async_trait]
impl PromptSelector for EmbeddingSelector {
    async fn select_best_prompt(
        &self,
        pool: &[String],
        message: &str,
    ) -> Result<String, SelectionError> {
        let best = self
            .matcher
            .find_best_matches(message, pool, 1)
            .await?
            .into_iter()
            .next()
            .ok_or(SelectionError::NoMatch)?;

        debug!(pool = pool.len(), "Selected best prompt");
        Ok(best)
    }
}
