//! `promptrelay ask`: single-turn answer with the best-matching prompt.

use std::collections::HashMap;

use promptrelay_config::AppConfig;

pub async fn run(
    config: &AppConfig,
    message: &str,
    vars: Vec<(String, String)>,
) -> Result<(), Box<dyn std::error::Error>> {
    let agent = super::agent(config)?;
    let values: HashMap<String, String> = vars.into_iter().collect();

    eprint!("  Thinking...");
    let response = agent.process_message(message, &values).await;
    eprint!("\r              \r");

    println!("{}", response?);
    Ok(())
}
