//! The agent: prompt pool, selector, renderer and an optional pipeline over
//! one gateway.

use std::collections::HashMap;
use std::sync::Arc;

use promptrelay_config::{AgentConfig, TemplateConfig};
use promptrelay_core::error::AgentError;
use promptrelay_core::gateway::Gateway;
use promptrelay_selection::{EmbeddingSelector, PromptSelector};
use tracing::{debug, info};

use crate::pipeline::Pipeline;
use crate::render::TemplateRenderer;

/// Who the agent is. Used for logging and status output only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentIdentity {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl AgentIdentity {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}

pub struct Agent {
    identity: AgentIdentity,
    prompt_pool: Vec<String>,
    default_values: HashMap<String, String>,
    gateway: Arc<dyn Gateway>,
    selector: Box<dyn PromptSelector>,
    renderer: TemplateRenderer,
    pipeline: Option<Pipeline>,
}

impl Agent {
    /// Create an agent with an explicit selector and no pipeline.
    pub fn new(
        identity: AgentIdentity,
        prompt_pool: Vec<String>,
        gateway: Arc<dyn Gateway>,
        selector: Box<dyn PromptSelector>,
    ) -> Self {
        Self {
            identity,
            prompt_pool,
            default_values: HashMap::new(),
            gateway,
            selector,
            renderer: TemplateRenderer::default(),
            pipeline: None,
        }
    }

    /// Build an agent from configuration, selecting by embedding similarity
    /// through the same gateway used for completions.
    ///
    /// An empty `pipeline` list leaves the agent without a pipeline.
    pub fn from_config(
        config: &AgentConfig,
        template: &TemplateConfig,
        gateway: Arc<dyn Gateway>,
    ) -> Self {
        let renderer = TemplateRenderer::new(template.on_missing_key);
        let selector = Box::new(EmbeddingSelector::new(gateway.clone()));

        let mut agent = Self::new(
            AgentIdentity::new(&config.id, &config.name, &config.description),
            config.prompt_pool.clone(),
            gateway,
            selector,
        )
        .with_renderer(renderer)
        .with_default_values(config.default_values.clone());

        if !config.pipeline.is_empty() {
            agent = agent.with_pipeline(Pipeline::new(config.pipeline.clone()).with_renderer(renderer));
        }
        agent
    }

    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = Some(pipeline);
        self
    }

    pub fn with_renderer(mut self, renderer: TemplateRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Values used when rendering a selected prompt; per-call values win.
    pub fn with_default_values(mut self, values: HashMap<String, String>) -> Self {
        self.default_values = values;
        self
    }

    pub fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    pub fn prompt_pool(&self) -> &[String] {
        &self.prompt_pool
    }

    pub fn pipeline(&self) -> Option<&Pipeline> {
        self.pipeline.as_ref()
    }

    pub fn gateway(&self) -> &Arc<dyn Gateway> {
        &self.gateway
    }

    /// Answer one message with the best-fitting prompt from the pool.
    ///
    /// Select, render with `prompt_values` layered over the agent's default
    /// values, then one completion with the rendered prompt as the system
    /// message and `message` as the user message.
    pub async fn process_message(
        &self,
        message: &str,
        prompt_values: &HashMap<String, String>,
    ) -> Result<String, AgentError> {
        let selected = self
            .selector
            .select_best_prompt(&self.prompt_pool, message)
            .await
            .map_err(AgentError::Selection)?;

        info!(
            target: "promptrelay::interactions",
            agent = %self.identity.id,
            "Selected prompt: {selected}"
        );

        let mut values = self.default_values.clone();
        values.extend(prompt_values.iter().map(|(k, v)| (k.clone(), v.clone())));

        let system_prompt = self
            .renderer
            .render("prompt", &selected, &values)
            .map_err(AgentError::Render)?;

        debug!(agent = %self.identity.id, chars = system_prompt.len(), "Rendered system prompt");

        let response = self
            .gateway
            .complete(&system_prompt, message)
            .await
            .map_err(AgentError::Completion)?;

        info!(
            target: "promptrelay::interactions",
            agent = %self.identity.id,
            message = %message,
            response = %response,
            "Message processed"
        );

        Ok(response)
    }

    /// Run the configured pipeline from `initial_input` with an empty
    /// variable map.
    pub async fn execute(&self, initial_input: &str) -> Result<String, AgentError> {
        let pipeline = self
            .pipeline
            .as_ref()
            .ok_or_else(|| AgentError::NoPipeline(self.identity.id.clone()))?;

        info!(
            agent = %self.identity.id,
            stages = pipeline.stages().len(),
            "Executing pipeline"
        );

        let mut variables = HashMap::new();
        pipeline
            .execute(self.gateway.as_ref(), initial_input, &mut variables)
            .await
            .map_err(AgentError::Pipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{ScriptedGateway, weather_agent};
    use promptrelay_core::error::{GatewayError, PipelineError, SelectionError, TemplateError};
    use promptrelay_core::template::{MissingKeyPolicy, PromptTemplate};

    const QUESTION: &str = "What's the temperature today?";

    #[tokio::test]
    async fn process_message_uses_selected_prompt_as_system() {
        let gateway = Arc::new(ScriptedGateway::weather(vec!["Sunny, 24C"]));
        let agent = weather_agent(gateway.clone());

        let reply = agent.process_message(QUESTION, &HashMap::new()).await.unwrap();

        assert_eq!(reply, "Sunny, 24C");
        assert_eq!(
            gateway.calls(),
            vec![("Weather?".to_string(), QUESTION.to_string())]
        );
    }

    #[tokio::test]
    async fn process_message_renders_prompt_values() {
        let gateway = Arc::new(ScriptedGateway::with_embeddings(
            vec!["ok", "ok"],
            vec![
                ("hi", vec![1.0, 0.0]),
                ("You are {{.name}}.", vec![1.0, 0.0]),
                ("unrelated", vec![0.0, 1.0]),
            ],
        ));
        let agent = Agent::new(
            AgentIdentity::new("a1", "Ada", ""),
            vec!["unrelated".into(), "You are {{.name}}.".into()],
            gateway.clone(),
            Box::new(EmbeddingSelector::new(gateway.clone())),
        )
        .with_default_values(HashMap::from([("name".to_string(), "Default".to_string())]));

        agent.process_message("hi", &HashMap::new()).await.unwrap();
        let values = HashMap::from([("name".to_string(), "Ada".to_string())]);
        agent.process_message("hi", &values).await.unwrap();

        let prompts = gateway.system_prompts();
        assert_eq!(prompts, vec!["You are Default.", "You are Ada."]);
    }

    #[tokio::test]
    async fn empty_pool_wraps_no_match() {
        let gateway = Arc::new(ScriptedGateway::weather(vec!["unused"]));
        let agent = Agent::new(
            AgentIdentity::new("a1", "Empty", ""),
            vec![],
            gateway.clone(),
            Box::new(EmbeddingSelector::new(gateway.clone())),
        );

        let err = agent.process_message(QUESTION, &HashMap::new()).await.unwrap_err();

        assert!(matches!(err, AgentError::Selection(SelectionError::NoMatch)));
        assert!(err.to_string().starts_with("error selecting best prompt"));
        assert_eq!(gateway.complete_calls(), 0);
    }

    #[tokio::test]
    async fn render_failure_is_wrapped() {
        let gateway = Arc::new(ScriptedGateway::with_embeddings(
            vec!["unused"],
            vec![("q", vec![1.0]), ("Hello {{.name", vec![1.0])],
        ));
        let agent = Agent::new(
            AgentIdentity::new("a1", "Broken", ""),
            vec!["Hello {{.name".into()],
            gateway.clone(),
            Box::new(EmbeddingSelector::new(gateway.clone())),
        );

        let err = agent.process_message("q", &HashMap::new()).await.unwrap_err();

        assert!(matches!(err, AgentError::Render(TemplateError::Syntax { .. })));
        assert_eq!(gateway.complete_calls(), 0);
    }

    #[tokio::test]
    async fn missing_value_under_error_policy() {
        let gateway = Arc::new(ScriptedGateway::with_embeddings(
            vec!["unused"],
            vec![("q", vec![1.0]), ("Hello {{.name}}", vec![1.0])],
        ));
        let agent = Agent::new(
            AgentIdentity::new("a1", "Strict", ""),
            vec!["Hello {{.name}}".into()],
            gateway.clone(),
            Box::new(EmbeddingSelector::new(gateway.clone())),
        )
        .with_renderer(TemplateRenderer::new(MissingKeyPolicy::Error));

        let err = agent.process_message("q", &HashMap::new()).await.unwrap_err();
        assert!(matches!(
            err,
            AgentError::Render(TemplateError::MissingVariable { .. })
        ));
    }

    #[tokio::test]
    async fn completion_failure_is_wrapped() {
        let gateway = Arc::new(ScriptedGateway::weather(vec![]).failing_at(0));
        let agent = weather_agent(gateway.clone());

        let err = agent.process_message(QUESTION, &HashMap::new()).await.unwrap_err();

        assert!(matches!(err, AgentError::Completion(GatewayError::ApiError { .. })));
        assert!(err.to_string().starts_with("error creating chat completion"));
    }

    #[tokio::test]
    async fn execute_without_pipeline_fails() {
        let gateway = Arc::new(ScriptedGateway::weather(vec![]));
        let agent = weather_agent(gateway);

        let err = agent.execute("anything").await.unwrap_err();
        assert!(matches!(err, AgentError::NoPipeline(ref id) if id == "agent001"));
    }

    #[tokio::test]
    async fn execute_runs_pipeline() {
        let gateway = Arc::new(ScriptedGateway::weather(vec!["A", "B"]));
        let agent = weather_agent(gateway.clone()).with_pipeline(Pipeline::new(vec![
            PromptTemplate::new("Analyze", "Analyze: {{.Input}}"),
            PromptTemplate::new("Summarize", "Summarize: {{.Input}}"),
        ]));

        let out = agent.execute("topic").await.unwrap();

        assert_eq!(out, "B");
        assert!(gateway.system_prompts()[1].contains("A"));
        assert_eq!(gateway.embed_calls(), 0);
    }

    #[tokio::test]
    async fn execute_wraps_stage_failure() {
        let gateway = Arc::new(ScriptedGateway::weather(vec!["A"]).failing_at(1));
        let agent = weather_agent(gateway).with_pipeline(Pipeline::new(vec![
            PromptTemplate::new("First", "1"),
            PromptTemplate::new("Second", "2 {{.Input}}"),
        ]));

        let err = agent.execute("x").await.unwrap_err();
        match err {
            AgentError::Pipeline(inner @ PipelineError::Completion { .. }) => {
                assert_eq!(inner.stage(), "Second");
            }
            other => panic!("expected pipeline completion error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn from_config_uses_pool_pipeline_and_defaults() {
        let config = AgentConfig::default();
        let gateway = Arc::new(ScriptedGateway::with_embeddings(
            vec!["reply"],
            vec![
                ("q", vec![0.0, 0.0, 1.0]),
                (config.prompt_pool[0].as_str(), vec![1.0, 0.0, 0.0]),
                (config.prompt_pool[1].as_str(), vec![0.0, 1.0, 0.0]),
                (config.prompt_pool[2].as_str(), vec![0.0, 0.1, 1.0]),
            ],
        ));

        let agent = Agent::from_config(&config, &TemplateConfig::default(), gateway.clone());
        assert_eq!(agent.identity().name, "InfoSeeker");
        assert_eq!(agent.pipeline().map(|p| p.stages().len()), Some(3));

        agent.process_message("q", &HashMap::new()).await.unwrap();
        assert_eq!(
            gateway.system_prompts()[0],
            "You are an AI assistant named InfoSeeker. Your task is to provide information \
             about various topics. Only provide a one sentence answer."
        );
    }

    #[tokio::test]
    async fn from_config_without_stages_has_no_pipeline() {
        let config = AgentConfig {
            pipeline: vec![],
            ..AgentConfig::default()
        };
        let gateway = Arc::new(ScriptedGateway::weather(vec![]));

        let agent = Agent::from_config(&config, &TemplateConfig::default(), gateway);
        assert!(agent.pipeline().is_none());
        assert!(matches!(
            agent.execute("x").await,
            Err(AgentError::NoPipeline(_))
        ));
    }
}
