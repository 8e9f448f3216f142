//! PromptRelay CLI, the main entry point.
//!
//! Commands:
//! - `ask`     Answer one message with the best-fitting pooled prompt
//! - `run`     Run the configured prompt pipeline
//! - `rank`    Show how the prompt pool ranks against a message
//! - `status`  Show configuration and gateway status
//! - `init`    Write a default config file

use clap::{Parser, Subcommand};
use promptrelay_config::{AppConfig, ConfigError};

mod commands;
mod logging;

#[derive(Parser)]
#[command(
    name = "promptrelay",
    about = "PromptRelay: embedding-selected prompts and chained completions",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a single message with the best-matching prompt from the pool
    Ask {
        /// The user message
        #[arg(short, long)]
        message: String,

        /// Prompt value as KEY=VALUE (repeatable, overrides config defaults)
        #[arg(long = "var", value_name = "KEY=VALUE", value_parser = commands::parse_key_val)]
        vars: Vec<(String, String)>,
    },

    /// Run the configured pipeline
    Run {
        /// Initial input returned unchanged when the pipeline has no stages
        #[arg(short, long, default_value = "")]
        input: String,
    },

    /// Rank the prompt pool against a message
    Rank {
        /// The message to rank against
        #[arg(short, long)]
        message: String,

        /// Number of matches to show
        #[arg(short = 'n', long, default_value_t = 3)]
        top: usize,
    },

    /// Show configuration and gateway status
    Status {
        /// Query the gateway's models endpoint
        #[arg(long)]
        check: bool,
    },

    /// Write a default config file
    Init,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = AppConfig::load();
    let log_config = config
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();
    let _guard = logging::init(cli.verbose, &log_config)?;

    match cli.command {
        Commands::Ask { message, vars } => {
            commands::ask::run(&loaded(config)?, &message, vars).await?
        }
        Commands::Run { input } => commands::run::run(&loaded(config)?, &input).await?,
        Commands::Rank { message, top } => {
            commands::rank::run(&loaded(config)?, &message, top).await?
        }
        Commands::Status { check } => commands::status::run(&loaded(config)?, check).await?,
        Commands::Init => commands::init::run().await?,
    }

    Ok(())
}

fn loaded(config: Result<AppConfig, ConfigError>) -> Result<AppConfig, String> {
    config.map_err(|e| format!("Failed to load config: {e}"))
}
