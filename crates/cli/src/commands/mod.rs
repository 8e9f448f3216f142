pub mod ask;
pub mod init;
pub mod rank;
pub mod run;
pub mod status;

use std::sync::Arc;

use promptrelay_agent::Agent;
use promptrelay_config::AppConfig;
use promptrelay_core::Gateway;

/// Parse a `KEY=VALUE` pair for `--var`.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no `=` found in `{s}`"))?;
    if key.trim().is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in `{s}`"));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

/// Build the configured gateway, with setup instructions when no key is set.
pub fn gateway(config: &AppConfig) -> Result<Arc<dyn Gateway>, Box<dyn std::error::Error>> {
    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    PROMPTRELAY_API_KEY = 'sk-...'");
        eprintln!("    OPENAI_API_KEY      = 'sk-...'");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    Ok(Arc::new(promptrelay_providers::build_from_config(config)?))
}

pub fn agent(config: &AppConfig) -> Result<Agent, Box<dyn std::error::Error>> {
    Ok(Agent::from_config(&config.agent, &config.template, gateway(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_val_splits_on_first_equals() {
        assert_eq!(
            parse_key_val("task=a=b").unwrap(),
            ("task".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_key_val("name=").unwrap(),
            ("name".to_string(), String::new())
        );
    }

    #[test]
    fn key_val_rejects_malformed() {
        assert!(parse_key_val("novalue").is_err());
        assert!(parse_key_val("=x").is_err());
    }
}
