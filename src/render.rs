//! Terminal rendering for chat transcripts
//!
//! Pure formatting helpers. Nothing here touches session state; rendering
//! the same transcript twice yields the same text, so callers can redraw
//! freely.

use colored::Colorize;

use crate::message::{AttachmentMeta, Message, Sender};

/// Welcome lines shown when the transcript is empty
pub const WELCOME_LINES: [&str; 2] = [
    "How can I help you today?",
    "Attach an image or a file and ask me anything!",
];

/// Get a colored tag for a message sender
///
/// # Examples
///
/// ```ignore
/// use visor::message::Sender;
/// use visor::render::sender_tag;
///
/// println!("{}", sender_tag(Sender::User));  // Displays "[you]" in blue
/// ```
pub fn sender_tag(sender: Sender) -> String {
    match sender {
        Sender::User => format!("[{}]", "you".blue().bold()),
        Sender::Model => format!("[{}]", "visor".green().bold()),
    }
}

/// Format a one-line summary of an attachment
///
/// Shown beneath the user message that carried it. Images include their
/// pixel dimensions when the header could be probed at staging time.
pub fn attachment_chip(meta: &AttachmentMeta) -> String {
    match meta.dimensions {
        Some((width, height)) => format!(
            "(attachment: {}, {}, {}x{})",
            meta.display_name, meta.mime_type, width, height
        ),
        None => format!("(attachment: {}, {})", meta.display_name, meta.mime_type),
    }
}

/// Format a single message for terminal display
pub fn format_message(message: &Message) -> String {
    let timestamp = message.timestamp.format("%H:%M:%S").to_string();
    let mut out = format!(
        "{} {} {}",
        timestamp.dimmed(),
        sender_tag(message.sender),
        message.text
    );
    if let Some(meta) = &message.attachment {
        out.push('\n');
        out.push_str(&format!("         {}", attachment_chip(meta).dimmed()));
    }
    out
}

/// Format a whole transcript, one message per block
pub fn render_transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(format_message)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the readline prompt, showing the staged attachment if any
///
/// ```ignore
/// use visor::render::compose_prompt;
///
/// println!("{}", compose_prompt(Some("photo.png")));  // Displays "[photo.png] >> "
/// ```
pub fn compose_prompt(staged_name: Option<&str>) -> String {
    match staged_name {
        Some(name) => format!("{} >> ", format!("[{}]", name).yellow()),
        None => ">> ".to_string(),
    }
}
