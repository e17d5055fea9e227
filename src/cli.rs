//! Command-line interface definition for Visor
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive chat, one-shot prompts, and model
//! discovery.

use clap::{Parser, Subcommand};

/// Visor - Terminal vision chat for Gemini
///
/// Chat with a Gemini model from the terminal, attaching images or text
/// files to your questions.
#[derive(Parser, Debug, Clone)]
#[command(name = "visor")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute; defaults to interactive chat
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for Visor
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start interactive chat mode
    Chat,

    /// Send a single prompt and print the reply
    Ask {
        /// The question to send
        prompt: String,

        /// Path of an image or text file to send with the prompt
        #[arg(short, long)]
        attach: Option<String>,
    },

    /// Inspect available models
    Models {
        /// Model management subcommand
        #[command(subcommand)]
        command: ModelCommand,
    },
}

/// Model management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ModelCommand {
    /// List models offered by the provider
    List {
        /// Output pretty-printed JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the model the session will use
    Current,
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            command: None,
        }
    }
}
