//! Gateway trait: the abstraction over the remote inference service.
//!
//! A Gateway knows how to turn a system prompt plus a user message into a
//! completion, and how to turn a piece of text into an embedding vector.
//! Both calls are single point-to-point requests: no streaming, batching or
//! retry.
//!
//! Implementations: OpenAI-compatible endpoints (`promptrelay-providers`),
//! plus the stub gateways used throughout the test suites.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::GatewayError;

/// An embedding as handed out by the cache: immutable and cheap to share.
pub type EmbeddingVector = Arc<[f32]>;

/// The remote inference boundary.
///
/// The selector, pipeline and agent only call through this trait, so any
/// backend (or a deterministic stub) can be plugged in.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// A human-readable name for this gateway (e.g., "openai").
    fn name(&self) -> &str;

    /// Send one system-role and one user-role message, return the text of
    /// the first choice.
    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> std::result::Result<String, GatewayError>;

    /// Embed a single text, return the first embedding vector.
    ///
    /// Implementations must fail rather than return an empty vector.
    async fn embed(&self, text: &str) -> std::result::Result<Vec<f32>, GatewayError>;

    /// Health check: can we reach the service?
    async fn health_check(&self) -> std::result::Result<bool, GatewayError> {
        Ok(true)
    }
}
