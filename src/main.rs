//! Visor - Terminal vision chat for Gemini
//!
//! Main entry point for the Visor chat application.

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use visor::cli::{Cli, Commands, ModelCommand};
use visor::commands;
use visor::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing; --verbose raises the default level to debug
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command; no subcommand means interactive chat
    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            commands::chat::run_chat(config).await?;
            Ok(())
        }
        Commands::Ask { prompt, attach } => {
            tracing::info!("Starting one-shot ask command");
            commands::ask::run_ask(config, prompt, attach).await?;
            Ok(())
        }
        Commands::Models { command } => {
            tracing::info!("Starting model management command");
            match command {
                ModelCommand::List { json } => {
                    commands::models::list_models(&config, json).await?;
                    Ok(())
                }
                ModelCommand::Current => {
                    commands::models::show_current_model(&config)?;
                    Ok(())
                }
            }
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so transcripts and replies on stdout stay clean for
/// piping.
fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "visor=debug" } else { "visor=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
