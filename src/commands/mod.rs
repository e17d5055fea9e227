/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes three top-level command modules:

- `chat`   - Interactive chat mode
- `ask`    - One-shot prompt, suitable for scripting
- `models` - Model discovery on the configured provider

These handlers are intentionally small and use the library components:
providers, attachments, and the session.
*/

use crate::attachment::StagedAttachment;
use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
use crate::config::Config;
use crate::error::Result;
use crate::providers::create_provider;
use crate::render;
use crate::session::{Session, TurnOutcome};

// Special commands parser for the chat loop
pub mod special_commands;

// Model management commands
pub mod models;

// Chat command handler
pub mod chat {
    //! Interactive chat mode handler.
    //!
    //! Instantiates the provider, creates a `Session`, and runs a
    //! readline-based interactive loop that submits user input as turns.
    //!
    //! Slash commands manage the staged attachment and session info;
    //! everything else goes to the model.

    use super::*;
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;
    use std::io::Write;

    /// Start interactive chat mode
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    ///
    /// # Examples
    ///
    /// ```
    /// use visor::commands::chat;
    /// use visor::config::Config;
    ///
    /// // In application code:
    /// // chat::run_chat(Config::default()).await?;
    /// ```
    pub async fn run_chat(config: Config) -> Result<()> {
        tracing::info!("Starting interactive chat mode");

        let provider = create_provider(&config.provider.provider_type, &config.provider)?;
        let mut session = Session::new(provider, config.session.clone());

        // Create readline instance
        let mut rl = DefaultEditor::new()?;

        print_welcome_banner(session.model());

        loop {
            let staged_name = session
                .staged_attachment()
                .map(|staged| staged.file_name.clone());
            let prompt = render::compose_prompt(staged_name.as_deref());

            match rl.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    // Add to history
                    rl.add_history_entry(trimmed)?;

                    // Check for special commands first
                    match parse_special_command(trimmed) {
                        Ok(SpecialCommand::Attach(path)) => {
                            handle_attach(&mut session, &path);
                            continue;
                        }
                        Ok(SpecialCommand::Detach) => {
                            match session.clear_attachment() {
                                Some(staged) => {
                                    println!("Removed attachment {}\n", staged.file_name)
                                }
                                None => println!("No attachment staged\n"),
                            }
                            continue;
                        }
                        Ok(SpecialCommand::History) => {
                            print_history(&session);
                            continue;
                        }
                        Ok(SpecialCommand::Status) => {
                            print_status_display(&session);
                            continue;
                        }
                        Ok(SpecialCommand::Help) => {
                            print_help();
                            continue;
                        }
                        Ok(SpecialCommand::ClearScreen) => {
                            clear_screen(&mut std::io::stdout())?;
                            continue;
                        }
                        Ok(SpecialCommand::Exit) => break,
                        Ok(SpecialCommand::None) => {
                            // Regular chat turn
                        }
                        Err(e) => {
                            eprintln!("{}\n", e.to_string().red());
                            continue;
                        }
                    }

                    match session.begin_turn(trimmed) {
                        Some(turn) => {
                            // Echo the accepted user message so the
                            // attachment chip is visible above the reply.
                            if let Some(message) = session.messages().last() {
                                println!("\n{}", render::format_message(message));
                            }

                            session.complete_turn(turn).await;

                            if let Some(message) = session.messages().last() {
                                println!("{}\n", render::format_message(message));
                            }
                            if let Some(error) = session.last_error() {
                                eprintln!("{}\n", error.red());
                            }
                        }
                        None => {
                            println!("Nothing to send: type a message or /attach a file first\n");
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("Interrupted (press Ctrl-D or type 'exit' to quit)");
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Stage an attachment from a user-supplied path, reporting the result
    fn handle_attach(session: &mut Session, path: &str) {
        match StagedAttachment::stage(path) {
            Ok(staged) => {
                println!(
                    "{}\n",
                    format!("Attached {} ({})", staged.file_name, staged.mime_type).green()
                );
                session.stage_attachment(staged);
            }
            Err(e) => {
                eprintln!("{}\n", format!("Error: {}", e).red());
            }
        }
    }

    /// Reprint the transcript, or the welcome copy when it is empty
    fn print_history(session: &Session) {
        if session.is_empty() {
            println!();
            for line in render::WELCOME_LINES {
                println!("{}", line);
            }
            println!();
        } else {
            println!("\n{}\n", render::render_transcript(session.messages()));
        }
    }

    /// Display welcome banner at the start of interactive chat mode
    ///
    /// Shows a formatted banner with the application name and the model
    /// the session will talk to.
    fn print_welcome_banner(model: &str) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                 Visor Vision Chat - Welcome!                 ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("Model: {}\n", model.cyan());
        for line in render::WELCOME_LINES {
            println!("{}", line);
        }
        println!("\nType '/help' for available commands, 'exit' to quit\n");
    }

    /// Display detailed status information about the current session
    ///
    /// Shows the active model, transcript size, staged attachment, and the
    /// last turn error. This is called when the user types '/status'.
    fn print_status_display(session: &Session) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                     Visor Session Status                     ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("Model:             {}", session.model());
        println!("Messages:          {}", session.len());
        println!(
            "Turn in flight:    {}",
            if session.is_pending() { "yes" } else { "no" }
        );
        match session.staged_attachment() {
            Some(staged) => println!(
                "Staged attachment: {} ({})",
                staged.file_name, staged.mime_type
            ),
            None => println!("Staged attachment: none"),
        }
        if let Some(error) = session.last_error() {
            println!("Last error:        {}", error);
        }
        println!();
    }

    // ANSI escape: clear the screen and move the cursor to the top left.
    const CLEAR_SCREEN: &str = "\x1b[2J\x1b[1;1H";

    /// Clear the terminal, leaving the transcript intact
    ///
    /// The escape carries no newline, so line-buffered stdout only shows
    /// it after an explicit flush.
    fn clear_screen(out: &mut impl Write) -> std::io::Result<()> {
        out.write_all(CLEAR_SCREEN.as_bytes())?;
        out.flush()
    }

}

// Ask command handler
pub mod ask {
    //! One-shot prompt handler.
    //!
    //! Runs a single turn against the provider and prints the reply to
    //! stdout, which keeps the output pipe-friendly. A failed turn exits
    //! non-zero with the error on stderr.

    use super::*;

    /// Run a single prompt and print the reply
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `prompt` - The question to send
    /// * `attach` - Optional path of a file to send with the prompt
    ///
    /// # Errors
    ///
    /// Returns an error when the provider cannot be constructed, the
    /// attachment cannot be staged, or the turn fails.
    pub async fn run_ask(config: Config, prompt: String, attach: Option<String>) -> Result<()> {
        tracing::info!("Running one-shot prompt");

        let provider = create_provider(&config.provider.provider_type, &config.provider)?;
        let mut session = Session::new(provider, config.session.clone());

        if let Some(path) = attach {
            session.stage_attachment(StagedAttachment::stage(&path)?);
        }

        match session.submit(&prompt).await {
            TurnOutcome::Completed => {
                if let Some(message) = session.messages().last() {
                    println!("{}", message.text);
                }
                Ok(())
            }
            TurnOutcome::Failed => {
                let error = session
                    .last_error()
                    .unwrap_or("Failed to get a response")
                    .to_string();
                Err(anyhow::anyhow!(error))
            }
            TurnOutcome::Rejected => Err(anyhow::anyhow!(
                "Nothing to send: provide a prompt or an attachment"
            )),
        }
    }
}
