//! Chat session management for Visor
//!
//! This module owns the conversation transcript and the turn state machine.
//! A session moves Idle -> Submitting -> (Succeeded | Failed) -> Idle, with
//! at most one turn in flight. Every accepted turn appends exactly two
//! messages: the user message immediately on acceptance, and a model
//! message (reply or failure notice) when the turn resolves.
//!
//! Submission is split into two phases. `begin_turn` applies the entry
//! guard, appends the user message, and consumes the staged attachment;
//! `complete_turn` preprocesses the attachment, calls the provider, and
//! appends the model message. `submit` composes both.

use crate::attachment::{self, StagedAttachment};
use crate::config::SessionConfig;
use crate::error::Result;
use crate::message::Message;
use crate::providers::Provider;

/// Outcome of a submitted turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The provider replied; a model message with the reply was appended
    Completed,
    /// The turn failed; a failure notice was appended and `last_error` set
    Failed,
    /// The entry guard declined the submission; nothing changed
    Rejected,
}

/// An accepted turn waiting to be completed
///
/// Produced by [`Session::begin_turn`]. Holds the prompt and the staged
/// attachment taken from compose state at acceptance.
#[derive(Debug)]
pub struct PreparedTurn {
    prompt: String,
    attachment: Option<StagedAttachment>,
}

/// A chat session: transcript, compose state, and turn lifecycle
///
/// The transcript is append-only. Messages are never reordered, mutated,
/// or dropped; state lives in memory and is cleared only by dropping the
/// session.
pub struct Session {
    provider: Box<dyn Provider>,
    config: SessionConfig,
    messages: Vec<Message>,
    pending: bool,
    last_error: Option<String>,
    staged: Option<StagedAttachment>,
}

impl Session {
    /// Create a new session backed by the given provider
    pub fn new(provider: Box<dyn Provider>, config: SessionConfig) -> Self {
        Self {
            provider,
            config,
            messages: Vec::new(),
            pending: false,
            last_error: None,
            staged: None,
        }
    }

    /// The transcript, in order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages in the transcript
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the transcript is empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Whether a turn is currently in flight
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Description of the most recent failed turn, if any
    ///
    /// Cleared when the next turn is accepted.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The attachment staged for the next turn, if any
    pub fn staged_attachment(&self) -> Option<&StagedAttachment> {
        self.staged.as_ref()
    }

    /// Stage an attachment for the next turn, replacing any previous one
    pub fn stage_attachment(&mut self, staged: StagedAttachment) {
        tracing::debug!("Staging attachment: {}", staged.file_name);
        self.staged = Some(staged);
    }

    /// Remove the staged attachment, returning it if one was staged
    pub fn clear_attachment(&mut self) -> Option<StagedAttachment> {
        self.staged.take()
    }

    /// The model identifier the provider targets
    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Accept or reject a submission
    ///
    /// Rejects (returns `None`, with no state change and no remote call)
    /// while a turn is in flight, or when the trimmed prompt is empty and
    /// no attachment is staged.
    ///
    /// On acceptance: clears `last_error`, appends the user message with
    /// attachment metadata, takes the staged attachment out of compose
    /// state, and marks the session pending. Compose state is cleared
    /// here, on dispatch; a turn that later fails does not restore it.
    pub fn begin_turn(&mut self, prompt: &str) -> Option<PreparedTurn> {
        if self.pending {
            tracing::warn!("Ignoring submission while a turn is in flight");
            return None;
        }
        if prompt.trim().is_empty() && self.staged.is_none() {
            tracing::debug!("Ignoring blank submission with no attachment");
            return None;
        }

        self.last_error = None;
        let attachment = self.staged.take();
        let meta = attachment.as_ref().map(|staged| staged.meta());
        self.messages.push(Message::user(prompt, meta));
        self.pending = true;

        Some(PreparedTurn {
            prompt: prompt.to_string(),
            attachment,
        })
    }

    /// Resolve an accepted turn
    ///
    /// Preprocesses the attachment, invokes the provider once, and appends
    /// the model message. Exactly one terminal outcome per accepted turn:
    /// on failure the model message is a failure notice carrying the error
    /// description, and `last_error` is set.
    pub async fn complete_turn(&mut self, turn: PreparedTurn) -> TurnOutcome {
        match self.run_turn(&turn).await {
            Ok(reply) => {
                self.messages.push(Message::model(reply));
                self.pending = false;
                TurnOutcome::Completed
            }
            Err(e) => {
                let description = e.to_string();
                tracing::error!("Turn failed: {}", description);
                self.last_error = Some(format!("Failed to get a response: {}", description));
                self.messages.push(Message::model(format!(
                    "Sorry, something went wrong. {}",
                    description
                )));
                self.pending = false;
                TurnOutcome::Failed
            }
        }
    }

    /// Submit one turn: entry guard, optimistic append, provider call
    pub async fn submit(&mut self, prompt: &str) -> TurnOutcome {
        match self.begin_turn(prompt) {
            Some(turn) => self.complete_turn(turn).await,
            None => TurnOutcome::Rejected,
        }
    }

    /// Preprocess the attachment and make the single provider call
    ///
    /// Image attachments are base64-encoded and sent inline alongside the
    /// unmodified prompt. Everything else is decoded as UTF-8 and spliced
    /// into a document-grounded combined prompt with no inline payload.
    async fn run_turn(&self, turn: &PreparedTurn) -> Result<String> {
        match &turn.attachment {
            Some(staged) if staged.is_image() => {
                let bytes =
                    attachment::load_bytes(staged, self.config.max_attachment_bytes).await?;
                let inline = attachment::encode_inline(&staged.mime_type, &bytes);
                self.provider.generate(&turn.prompt, Some(&inline)).await
            }
            Some(staged) => {
                let bytes =
                    attachment::load_bytes(staged, self.config.max_attachment_bytes).await?;
                let content = attachment::decode_text(&staged.file_name, bytes)?;
                let combined =
                    attachment::document_prompt(&staged.file_name, &content, &turn.prompt);
                self.provider.generate(&combined, None).await
            }
            None => self.provider.generate(&turn.prompt, None).await,
        }
    }
}
