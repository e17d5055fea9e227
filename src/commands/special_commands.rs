//! Special commands parser for interactive chat mode
//!
//! This module parses the slash commands available during a chat session.
//! Special commands manage compose state and display session information
//! rather than being submitted as turns:
//! - Stage or remove the attachment for the next message
//! - Reprint the transcript
//! - View session status
//! - Display help information
//! - Exit the session
//!
//! Commands are prefixed with `/` and are case-insensitive; `exit` and
//! `quit` are also accepted without a slash.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed during interactive chat
///
/// These commands modify compose state or provide information, rather
/// than being submitted to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Stage a file as the attachment for the next message
    ///
    /// The path is kept exactly as typed; only the command word is
    /// case-insensitive.
    Attach(String),

    /// Remove the staged attachment
    Detach,

    /// Reprint the transcript so far
    History,

    /// Display session status
    ///
    /// Shows the active model, message count, staged attachment, and the
    /// last turn error if any.
    Status,

    /// Display help information
    Help,

    /// Clear the screen
    ///
    /// Only the terminal is cleared; the transcript is kept and can be
    /// reprinted with `/history`.
    ClearScreen,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be submitted as a regular chat turn.
    None,
}

/// Parse a user input string into a special command
///
/// Checks if the input matches any special command pattern. Command words
/// are case-insensitive; the `/attach` path argument is preserved as
/// typed.
///
/// # Arguments
///
/// * `input` - The user input string to parse
///
/// # Returns
///
/// Returns Ok(SpecialCommand) for valid commands or SpecialCommand::None
/// for non-commands.
///
/// # Errors
///
/// Returns CommandError::UnknownCommand if input starts with "/" but is
/// not a valid command.
/// Returns CommandError::MissingArgument if a command requires an argument
/// but none was provided.
///
/// # Examples
///
/// ```
/// use visor::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// let cmd = parse_special_command("/attach photo.png").unwrap();
/// assert_eq!(cmd, SpecialCommand::Attach("photo.png".to_string()));
///
/// let cmd = parse_special_command("/detach").unwrap();
/// assert_eq!(cmd, SpecialCommand::Detach);
///
/// let cmd = parse_special_command("hello there").unwrap();
/// assert_eq!(cmd, SpecialCommand::None);
///
/// // Invalid command returns error
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    // If input doesn't start with "/", it's not a command (except exit/quit)
    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    match lower.as_str() {
        // Attachment staging
        "/attach" => Err(CommandError::MissingArgument {
            command: "/attach".to_string(),
            usage: "/attach <path>".to_string(),
        }),
        _ if lower.starts_with("/attach ") => {
            // Take the path from the original input; case matters on disk.
            let path = trimmed[8..].trim();
            if path.is_empty() {
                Err(CommandError::MissingArgument {
                    command: "/attach".to_string(),
                    usage: "/attach <path>".to_string(),
                })
            } else {
                Ok(SpecialCommand::Attach(path.to_string()))
            }
        }
        "/detach" => Ok(SpecialCommand::Detach),

        // Transcript and session information
        "/history" => Ok(SpecialCommand::History),
        "/status" => Ok(SpecialCommand::Status),
        "/help" | "/?" => Ok(SpecialCommand::Help),

        // Session control
        "/clear" => Ok(SpecialCommand::ClearScreen),
        "exit" | "quit" | "/exit" | "/quit" => Ok(SpecialCommand::Exit),

        // Unknown command starting with "/"
        _ if lower.starts_with('/') => {
            let cmd = lower.split_whitespace().next().unwrap_or(&lower);
            Err(CommandError::UnknownCommand(cmd.to_string()))
        }

        // Not a special command
        _ => Ok(SpecialCommand::None),
    }
}

/// Display help text for special commands
///
/// Shows all available special commands with their descriptions
/// and usage examples.
///
/// # Examples
///
/// ```
/// use visor::commands::special_commands::print_help;
///
/// print_help();
/// ```
pub fn print_help() {
    println!(
        r#"
Special Commands for Interactive Chat
=====================================

ATTACHMENTS:
  /attach <path>  - Stage an image or text file for the next message
  /detach         - Remove the staged attachment

SESSION INFORMATION:
  /history        - Reprint the conversation so far
  /status         - Show model, message count, and attachment state
  /help           - Show this help message
  /?              - Same as /help

SESSION CONTROL:
  /clear          - Clear the screen (the conversation is kept)
  exit            - Exit the chat
  quit            - Same as exit

NOTES:
  - Commands are case-insensitive; attachment paths are kept as typed
  - Regular text (not starting with /) is sent to the model
  - Images are sent inline; other files are pasted in as document text
  - The staged attachment rides along with the next message you send
"#
    );
}
