//! Prompt templates and the missing-variable policy.

use serde::{Deserialize, Serialize};

/// An immutable, named template body with `{{.Key}}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub name: String,
    #[serde(alias = "template")]
    pub body: String,
}

impl PromptTemplate {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
        }
    }
}

/// What the renderer does when a placeholder names an unknown variable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingKeyPolicy {
    /// Render the placeholder as an empty string.
    #[default]
    Empty,
    /// Fail with `TemplateError::MissingVariable`.
    Error,
}
