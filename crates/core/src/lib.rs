//! # PromptRelay Core
//!
//! Domain types, traits, and error definitions for the PromptRelay agent
//! harness. This crate has **no framework dependencies**: it defines the
//! domain model that the other crates implement against.
//!
//! ## Design Philosophy
//!
//! The remote inference service is a trait here ([`Gateway`]); the HTTP
//! implementation lives in `promptrelay-providers`. Selection, rendering and
//! pipelines only ever see the trait, so tests run against stub gateways.

pub mod error;
pub mod gateway;
pub mod message;
pub mod template;

// Re-export key types at crate root for ergonomics
pub use error::{AgentError, GatewayError, PipelineError, SelectionError, TemplateError};
pub use gateway::{EmbeddingVector, Gateway};
pub use message::{ChatMessage, Role};
pub use template::{MissingKeyPolicy, PromptTemplate};
