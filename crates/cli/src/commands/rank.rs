//! `promptrelay rank`: show similarity scores of the prompt pool.

use promptrelay_config::AppConfig;
use promptrelay_selection::EmbeddingMatcher;

pub async fn run(
    config: &AppConfig,
    message: &str,
    top: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let matcher = EmbeddingMatcher::new(super::gateway(config)?);

    let mut ranked = matcher.rank(message, &config.agent.prompt_pool).await?;
    ranked.truncate(top);

    for (i, candidate) in ranked.iter().enumerate() {
        println!("  {:>2}. [{:.4}] {}", i + 1, candidate.score, candidate.text);
    }
    Ok(())
}
