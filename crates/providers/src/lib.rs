//! Remote inference gateways for PromptRelay.
//!
//! All gateways implement the `promptrelay_core::Gateway` trait.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatGateway;

use promptrelay_config::AppConfig;
use promptrelay_core::error::GatewayError;

/// Build the gateway described by the configuration.
pub fn build_from_config(config: &AppConfig) -> Result<OpenAiCompatGateway, GatewayError> {
    let api_key = config.api_key.clone().ok_or_else(|| {
        GatewayError::NotConfigured(
            "no API key (set PROMPTRELAY_API_KEY or OPENAI_API_KEY)".into(),
        )
    })?;

    Ok(OpenAiCompatGateway::new(
        "openai",
        &config.base_url,
        api_key,
        std::time::Duration::from_secs(config.request_timeout_secs),
    )?
    .with_chat_model(&config.chat_model)
    .with_embedding_model(&config.embedding_model)
    .with_temperature(config.temperature))
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptrelay_core::Gateway;

    #[test]
    fn build_requires_api_key() {
        let config = AppConfig::default();
        let err = build_from_config(&config).unwrap_err();
        assert!(matches!(err, GatewayError::NotConfigured(_)));
    }

    #[test]
    fn build_uses_configured_models() {
        let config = AppConfig {
            api_key: Some("sk-test".into()),
            chat_model: "gpt-4o".into(),
            ..AppConfig::default()
        };
        let gateway = build_from_config(&config).unwrap();
        assert_eq!(gateway.name(), "openai");
        assert_eq!(gateway.chat_model(), "gpt-4o");
        assert_eq!(gateway.embedding_model(), "text-embedding-ada-002");
    }
}
