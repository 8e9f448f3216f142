//! OpenAI-compatible gateway implementation.
//!
//! Works with OpenAI, OpenRouter, Ollama, vLLM and any other endpoint that
//! exposes `/chat/completions` and `/embeddings` in the OpenAI format.
//!
//! Every call is a single request: no streaming, batching or retry.

use std::time::Duration;

use async_trait::async_trait;
use promptrelay_core::error::GatewayError;
use promptrelay_core::gateway::Gateway;
use promptrelay_core::message::ChatMessage;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// An OpenAI-compatible inference gateway.
pub struct OpenAiCompatGateway {
    name: String,
    base_url: String,
    api_key: String,
    chat_model: String,
    embedding_model: String,
    temperature: Option<f32>,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiCompatGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatGateway")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("chat_model", &self.chat_model)
            .field("embedding_model", &self.embedding_model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl OpenAiCompatGateway {
    /// Create a new gateway with the default models.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::NotConfigured(format!("failed to create HTTP client: {e}")))?;
        let base_url: String = base_url.into();

        Ok(Self {
            name: name.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            chat_model: "gpt-4o-mini".into(),
            embedding_model: "text-embedding-ada-002".into(),
            temperature: None,
            client,
        })
    }

    /// Create an OpenAI gateway (convenience constructor).
    pub fn openai(api_key: impl Into<String>) -> Result<Self, GatewayError> {
        Self::new(
            "openai",
            "https://api.openai.com/v1",
            api_key,
            Duration::from_secs(120),
        )
    }

    pub fn with_chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_model = model.into();
        self
    }

    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn chat_model(&self) -> &str {
        &self.chat_model
    }

    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    fn chat_body(&self, system_prompt: &str, user_message: &str) -> ChatRequest {
        ChatRequest {
            model: self.chat_model.clone(),
            messages: vec![
                ChatMessage::system(system_prompt),
                ChatMessage::user(user_message),
            ],
            temperature: self.temperature,
        }
    }

    /// Send a JSON body and turn any non-success status into an error.
    async fn post<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, GatewayError> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let status = status.as_u16();
        let error_body = response.text().await.unwrap_or_default();
        warn!(gateway = %self.name, status, body = %error_body, "Gateway returned error");

        if status == 401 || status == 403 {
            return Err(GatewayError::AuthenticationFailed {
                status_code: status,
                message: error_body,
            });
        }

        Err(GatewayError::ApiError {
            status_code: status,
            message: error_body,
        })
    }
}

#[async_trait]
impl Gateway for OpenAiCompatGateway {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, GatewayError> {
        debug!(gateway = %self.name, model = %self.chat_model, "Sending completion request");

        let body = self.chat_body(system_prompt, user_message);
        let response = self.post("chat/completions", &body).await?;

        let api_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(format!("Failed to parse response: {e}")))?;

        first_choice_text(api_response)
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, GatewayError> {
        debug!(
            gateway = %self.name,
            model = %self.embedding_model,
            chars = text.len(),
            "Sending embedding request"
        );

        let body = EmbeddingRequest {
            input: text.to_string(),
            model: self.embedding_model.clone(),
        };
        let response = self.post("embeddings", &body).await?;

        let api_response: EmbeddingResponse = response.json().await.map_err(|e| {
            GatewayError::MalformedResponse(format!("Failed to parse embedding response: {e}"))
        })?;

        first_embedding(api_response)
    }

    async fn health_check(&self) -> Result<bool, GatewayError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        Ok(response.status().is_success())
    }
}

fn first_choice_text(response: ChatResponse) -> Result<String, GatewayError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GatewayError::EmptyResponse("No choices in response".into()))?;

    Ok(choice.message.content.unwrap_or_default())
}

fn first_embedding(response: EmbeddingResponse) -> Result<Vec<f32>, GatewayError> {
    match response.data.into_iter().next() {
        Some(data) if !data.embedding.is_empty() => Ok(data.embedding),
        _ => Err(GatewayError::EmptyResponse(
            "No embedding data in response".into(),
        )),
    }
}

// --- OpenAI API types (internal) ---

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest {
    input: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    embedding: Vec<f32>,
}
