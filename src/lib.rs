//! Visor - Terminal vision chat for Gemini library
//!
//! This library provides the core functionality for the Visor chat client,
//! including session management, provider abstractions, attachment
//! handling, and configuration.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `session`: Conversation transcript and turn state machine
//! - `providers`: AI provider abstraction and the Gemini implementation
//! - `attachment`: Staging, classification, and encoding of attached files
//! - `message`: Transcript message types
//! - `render`: Pure terminal formatting for transcripts
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use visor::{Config, Session};
//! use visor::providers::create_provider;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let provider = create_provider(&config.provider.provider_type, &config.provider)?;
//!     let mut session = Session::new(provider, config.session.clone());
//!     session.submit("What can you see here?").await;
//!     Ok(())
//! }
//! ```

pub mod attachment;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod message;
pub mod providers;
pub mod render;
pub mod session;

// Re-export commonly used types
pub use attachment::StagedAttachment;
pub use config::Config;
pub use error::{Result, VisorError};
pub use message::{AttachmentMeta, Message, Sender};
pub use session::{Session, TurnOutcome};

#[cfg(test)]
pub mod test_utils;
