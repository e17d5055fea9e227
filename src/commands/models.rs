//! Model management commands for Visor
//!
//! This module provides commands for discovering models on the configured
//! provider: listing what the remote API offers and displaying the model
//! the session will use.

use crate::config::Config;
use crate::error::{Result, VisorError};
use crate::providers;
use crate::providers::ModelInfo;
use prettytable::{row, Table};

/// List available models from the configured provider
///
/// # Arguments
///
/// * `config` - Configuration containing provider settings
/// * `json` - Output pretty-printed JSON instead of a table
///
/// # Returns
///
/// Returns Ok(()) on success, error if the provider is unavailable or
/// listing fails
///
/// # Examples
///
/// ```no_run
/// use visor::commands::models::list_models;
/// use visor::config::Config;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::default();
/// list_models(&config, false).await?;
/// # Ok(())
/// # }
/// ```
pub async fn list_models(config: &Config, json: bool) -> Result<()> {
    let provider_type = &config.provider.provider_type;

    tracing::info!("Listing models from provider: {}", provider_type);

    let provider = providers::create_provider(provider_type, &config.provider)?;
    let models = provider.list_models().await?;

    if models.is_empty() {
        if json {
            println!("[]");
        } else {
            println!("No models available from provider: {}", provider_type);
        }
        return Ok(());
    }

    if json {
        output_models_json(&models)?;
    } else {
        output_models_table(&models, provider_type);
    }

    Ok(())
}

/// Show the model the session will use
///
/// # Arguments
///
/// * `config` - Configuration containing provider settings
///
/// # Examples
///
/// ```no_run
/// use visor::commands::models::show_current_model;
/// use visor::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::default();
/// show_current_model(&config)?;
/// # Ok(())
/// # }
/// ```
pub fn show_current_model(config: &Config) -> Result<()> {
    let provider_type = &config.provider.provider_type;
    let provider = providers::create_provider(provider_type, &config.provider)?;

    println!("\nCurrent Model Information\n");
    println!("Provider:       {}", provider_type);
    println!("Active Model:   {}", provider.model());
    println!();

    Ok(())
}

/// Serialize a serializable value into a pretty JSON string
fn serialize_pretty<T: serde::Serialize + ?Sized>(
    value: &T,
) -> std::result::Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// Output models in JSON format
///
/// # Errors
///
/// Returns `VisorError::Serialization` if serialization fails
fn output_models_json(models: &[ModelInfo]) -> Result<()> {
    let json = serialize_pretty(models).map_err(VisorError::Serialization)?;
    println!("{}", json);
    Ok(())
}

/// Output models in table format
fn output_models_table(models: &[ModelInfo], provider_type: &str) {
    let mut table = Table::new();
    table.add_row(row!["Model Name", "Display Name", "Input Limit", "Output Limit"]);

    for model in models {
        table.add_row(row![
            model.name,
            model.display_name,
            format_token_limit(model.input_token_limit),
            format_token_limit(model.output_token_limit)
        ]);
    }

    println!("\nAvailable models from {}:\n", provider_type);
    table.printstd();
    println!();
}

/// Format a token limit for display; the API omits limits on some models
fn format_token_limit(limit: usize) -> String {
    if limit == 0 {
        "Unknown".to_string()
    } else {
        format!("{} tokens", limit)
    }
}
