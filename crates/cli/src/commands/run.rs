//! `promptrelay run`: execute the configured pipeline.

use promptrelay_config::AppConfig;

pub async fn run(config: &AppConfig, input: &str) -> Result<(), Box<dyn std::error::Error>> {
    let agent = super::agent(config)?;

    if let Some(pipeline) = agent.pipeline() {
        let names: Vec<_> = pipeline.stages().iter().map(|s| s.name.as_str()).collect();
        eprintln!("  Pipeline: {}", names.join(" -> "));
    }

    let output = agent.execute(input).await?;
    println!("{output}");
    Ok(())
}
