//! Shared test helpers for agent and pipeline tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use promptrelay_core::error::GatewayError;
use promptrelay_core::gateway::Gateway;
use promptrelay_selection::EmbeddingSelector;

use crate::agent::{Agent, AgentIdentity};

/// Returns scripted completions in call order and records every
/// `(system, user)` pair. Embeddings come from a fixed table.
pub struct ScriptedGateway {
    responses: Vec<String>,
    fail_at: Option<usize>,
    embeddings: HashMap<String, Vec<f32>>,
    calls: Mutex<Vec<(String, String)>>,
    embed_calls: Mutex<usize>,
}

impl ScriptedGateway {
    pub fn new(responses: Vec<&str>) -> Self {
        Self::with_embeddings(responses, vec![])
    }

    pub fn with_embeddings(responses: Vec<&str>, embeddings: Vec<(&str, Vec<f32>)>) -> Self {
        Self {
            responses: responses.into_iter().map(String::from).collect(),
            fail_at: None,
            embeddings: embeddings
                .into_iter()
                .map(|(text, v)| (text.to_string(), v))
                .collect(),
            calls: Mutex::new(Vec::new()),
            embed_calls: Mutex::new(0),
        }
    }

    /// The weather/joke/physics table used across selection tests.
    pub fn weather(responses: Vec<&str>) -> Self {
        Self::with_embeddings(
            responses,
            vec![
                ("What's the temperature today?", vec![0.9, 0.1, 0.0]),
                ("Weather?", vec![1.0, 0.0, 0.0]),
                ("Tell me a joke.", vec![0.0, 1.0, 0.0]),
                ("Explain quantum physics.", vec![0.0, 0.0, 1.0]),
            ],
        )
    }

    /// Make the completion call at `index` (zero-based) fail with a 500.
    pub fn failing_at(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn system_prompts(&self) -> Vec<String> {
        self.calls().into_iter().map(|(system, _)| system).collect()
    }

    pub fn complete_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn embed_calls(&self) -> usize {
        *self.embed_calls.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl Gateway for ScriptedGateway {
    fn name(&self) -> &str {
        "scripted_mock"
    }

    async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String, GatewayError> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((system_prompt.to_string(), user_message.to_string()));
            calls.len() - 1
        };

        if self.fail_at == Some(index) {
            return Err(GatewayError::ApiError {
                status_code: 500,
                message: "scripted failure".into(),
            });
        }

        self.responses
            .get(index)
            .cloned()
            .ok_or_else(|| GatewayError::EmptyResponse("No choices in response".into()))
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, GatewayError> {
        *self.embed_calls.lock().unwrap() += 1;
        self.embeddings
            .get(text)
            .cloned()
            .ok_or_else(|| GatewayError::EmptyResponse(format!("no embedding for '{text}'")))
    }
}

/// An agent over the weather pool, selecting through `gateway`.
pub fn weather_agent(gateway: Arc<ScriptedGateway>) -> Agent {
    Agent::new(
        AgentIdentity::new("agent001", "InfoSeeker", "An agent that searches for information"),
        vec![
            "Weather?".to_string(),
            "Tell me a joke.".to_string(),
            "Explain quantum physics.".to_string(),
        ],
        gateway.clone(),
        Box::new(EmbeddingSelector::new(gateway)),
    )
}
