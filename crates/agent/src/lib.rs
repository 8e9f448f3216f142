//! The PromptRelay agent.
//!
//! Two modes share one gateway:
//!
//! 1. **Single turn** ([`Agent::process_message`]): rank the prompt pool
//!    against the message, render the winner, send one completion with the
//!    rendered prompt as the system message.
//! 2. **Pipeline** ([`Agent::execute`]): walk a fixed list of templates,
//!    feeding each completion into the next stage's `Input` variable.

pub mod agent;
pub mod pipeline;
pub mod render;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use agent::{Agent, AgentIdentity};
pub use pipeline::{INPUT_VARIABLE, Pipeline};
pub use render::TemplateRenderer;
