//! Multi-stage prompt pipeline.
//!
//! A linear chain with exactly one transition per stage: render the stage's
//! template against the shared variables, complete it, store the response
//! under [`INPUT_VARIABLE`]. No branching, no retry.
//!
//! `Input` is **not** seeded from the initial input before the first stage.
//! A first-stage template that references `{{.Input}}` sees whatever the
//! caller put in the variables map (empty, or an error under the `error`
//! missing-key policy).

use std::collections::HashMap;

use promptrelay_core::error::PipelineError;
use promptrelay_core::gateway::Gateway;
use promptrelay_core::template::PromptTemplate;
use tracing::{debug, info};

use crate::render::TemplateRenderer;

/// Variable each stage's response is written to.
pub const INPUT_VARIABLE: &str = "Input";

/// User message sent alongside every stage's rendered system prompt.
pub const DEFAULT_STAGE_USER_MESSAGE: &str = "Proceed with the instructions above.";

#[derive(Debug, Clone)]
pub struct Pipeline {
    stages: Vec<PromptTemplate>,
    renderer: TemplateRenderer,
    user_message: String,
}

impl Pipeline {
    pub fn new(stages: Vec<PromptTemplate>) -> Self {
        Self {
            stages,
            renderer: TemplateRenderer::default(),
            user_message: DEFAULT_STAGE_USER_MESSAGE.to_string(),
        }
    }

    pub fn with_renderer(mut self, renderer: TemplateRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_user_message(mut self, message: impl Into<String>) -> Self {
        self.user_message = message.into();
        self
    }

    pub fn stages(&self) -> &[PromptTemplate] {
        &self.stages
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every stage in order and return the last response.
    ///
    /// `variables` is mutated in place: after a successful run it holds the
    /// final response under `Input`. A pipeline with no stages returns
    /// `initial_input` unchanged. The first failing stage aborts the run.
    pub async fn execute(
        &self,
        gateway: &dyn Gateway,
        initial_input: &str,
        variables: &mut HashMap<String, String>,
    ) -> Result<String, PipelineError> {
        let mut result = initial_input.to_string();

        for (index, stage) in self.stages.iter().enumerate() {
            let rendered = self
                .renderer
                .render(&stage.name, &stage.body, variables)
                .map_err(|source| PipelineError::Render {
                    stage: stage.name.clone(),
                    source,
                })?;

            debug!(stage = %stage.name, index, "Running pipeline stage");

            let response = gateway
                .complete(&rendered, &self.user_message)
                .await
                .map_err(|source| PipelineError::Completion {
                    stage: stage.name.clone(),
                    source,
                })?;

            info!(
                target: "promptrelay::interactions",
                stage = %stage.name,
                prompt = %rendered,
                response = %response,
                "Pipeline stage completed"
            );

            variables.insert(INPUT_VARIABLE.to_string(), response.clone());
            result = response;
        }

        Ok(result)
    }
}
