//! Shared test helpers for selection tests.

use std::collections::HashMap;
use std::sync::Mutex;

use promptrelay_core::error::GatewayError;
use promptrelay_core::gateway::Gateway;

/// A deterministic gateway that embeds known strings to known vectors and
/// counts every remote call.
///
/// Unknown texts fail with `EmptyResponse`, like an endpoint returning no
/// embedding data.
pub struct TableGateway {
    table: HashMap<String, Vec<f32>>,
    calls: Mutex<Vec<String>>,
}

impl TableGateway {
    pub fn new(entries: Vec<(&str, Vec<f32>)>) -> Self {
        Self {
            table: entries
                .into_iter()
                .map(|(text, v)| (text.to_string(), v))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Total embed calls made so far.
    pub fn embed_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Embed calls made for one specific text.
    pub fn embed_calls_for(&self, text: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|t| *t == text).count()
    }
}

#[async_trait::async_trait]
impl Gateway for TableGateway {
    fn name(&self) -> &str {
        "table_mock"
    }

    async fn complete(&self, _system_prompt: &str, _user_message: &str) -> Result<String, GatewayError> {
        Err(GatewayError::NotConfigured("table_mock does not complete".into()))
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, GatewayError> {
        self.calls.lock().unwrap().push(text.to_string());
        self.table
            .get(text)
            .cloned()
            .ok_or_else(|| GatewayError::EmptyResponse(format!("no embedding for '{text}'")))
    }
}

/// The weather/joke/physics pool with a query that sits closest to "Weather?".
pub fn weather_gateway() -> TableGateway {
    TableGateway::new(vec![
        ("What's the temperature today?", vec![0.9, 0.1, 0.0]),
        ("Weather?", vec![1.0, 0.0, 0.0]),
        ("Tell me a joke.", vec![0.0, 1.0, 0.0]),
        ("Explain quantum physics.", vec![0.0, 0.0, 1.0]),
    ])
}

pub fn weather_pool() -> Vec<String> {
    vec![
        "Weather?".to_string(),
        "Tell me a joke.".to_string(),
        "Explain quantum physics.".to_string(),
    ]
}
