//! `promptrelay status`: show configuration and optionally probe the gateway.

use promptrelay_config::AppConfig;

pub async fn run(config: &AppConfig, check: bool) -> Result<(), Box<dyn std::error::Error>> {
    println!("PromptRelay Status");
    println!("==================");
    println!("  Config dir:     {}", AppConfig::config_dir().display());
    println!("  Base URL:       {}", config.base_url);
    println!("  Chat model:     {}", config.chat_model);
    println!("  Embed model:    {}", config.embedding_model);
    println!("  Temperature:    {}", config.temperature);
    println!("  Timeout:        {}s", config.request_timeout_secs);
    println!("  API key:        {}", if config.has_api_key() { "set" } else { "missing" });
    println!("  Missing keys:   {:?}", config.template.on_missing_key);
    println!(
        "  Interaction log: {}",
        if config.logging.enabled {
            config.logging.interaction_log.display().to_string()
        } else {
            "disabled".to_string()
        }
    );
    println!(
        "  Agent:          {} ({}) - {}",
        config.agent.name, config.agent.id, config.agent.description
    );
    println!("  Prompt pool:    {} prompts", config.agent.prompt_pool.len());
    println!("  Pipeline:       {} stages", config.agent.pipeline.len());

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file, run `promptrelay init` first");
    }

    if check {
        let gateway = super::gateway(config)?;
        match gateway.health_check().await {
            Ok(true) => println!("  ✅ Gateway '{}' reachable", gateway.name()),
            Ok(false) => println!("  ⚠️  Gateway '{}' answered but is unhealthy", gateway.name()),
            Err(e) => println!("  ❌ Gateway '{}' check failed: {e}", gateway.name()),
        }
    }

    Ok(())
}
