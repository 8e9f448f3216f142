//! Embedding-based prompt selection.
//!
//! - [`EmbeddingCache`]: exact-text memoization of embedding vectors
//! - [`cosine_similarity`] and [`rank_by_similarity`]: pure-Rust scoring
//! - [`EmbeddingMatcher`]: top-N nearest candidates for a query
//! - [`PromptSelector`]: the capability the agent depends on, with the
//!   embedding-backed [`EmbeddingSelector`] as the default implementation

pub mod cache;
pub mod matcher;
pub mod selector;
pub mod similarity;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use cache::EmbeddingCache;
pub use matcher::EmbeddingMatcher;
pub use selector::{EmbeddingSelector, PromptSelector};
pub use similarity::{ScoredCandidate, cosine_similarity, rank_by_similarity};
