//! Error types for the PromptRelay domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum. [`AgentError`] wraps the
//! others with the step that failed.

use thiserror::Error;

/// A remote inference call failed.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Authentication failed: {message} (status: {status_code})")]
    AuthenticationFailed { status_code: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Empty response: {0}")]
    EmptyResponse(String),

    #[error("Gateway not configured: {0}")]
    NotConfigured(String),
}

impl GatewayError {
    /// The HTTP status associated with the failure, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::ApiError { status_code, .. }
            | GatewayError::AuthenticationFailed { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template syntax error in '{template}': {reason}")]
    Syntax { template: String, reason: String },

    #[error("Missing template variable in '{template}': {reason}")]
    MissingVariable { template: String, reason: String },
}

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("no matching prompt found")]
    NoMatch,

    #[error("error finding best match: {0}")]
    Gateway(#[from] GatewayError),
}

/// A pipeline stage failed. Carries the stage name; remaining stages are skipped.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("stage '{stage}': error rendering template: {source}")]
    Render {
        stage: String,
        #[source]
        source: TemplateError,
    },

    #[error("stage '{stage}': error creating chat completion: {source}")]
    Completion {
        stage: String,
        #[source]
        source: GatewayError,
    },
}

impl PipelineError {
    pub fn stage(&self) -> &str {
        match self {
            PipelineError::Render { stage, .. } | PipelineError::Completion { stage, .. } => stage,
        }
    }
}

/// Agent-level failures, annotated with the step that produced them.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("error selecting best prompt: {0}")]
    Selection(#[source] SelectionError),

    #[error("error rendering prompt: {0}")]
    Render(#[source] TemplateError),

    #[error("error creating chat completion: {0}")]
    Completion(#[source] GatewayError),

    #[error("error executing pipeline: {0}")]
    Pipeline(#[source] PipelineError),

    #[error("agent '{0}' has no pipeline configured")]
    NoPipeline(String),
}
