//! Transcript message types for Visor
//!
//! Defines the messages that make up a chat transcript, the sender tags,
//! and the attachment metadata carried on user messages. Messages are
//! immutable once created; the transcript itself is append-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who produced a transcript message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The local human user
    User,
    /// The remote model
    Model,
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Model => write!(f, "model"),
        }
    }
}

/// Display metadata for an attachment carried on a user message
///
/// This is what the transcript shows; the payload bytes themselves are
/// never stored on the message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttachmentMeta {
    /// Original file name, e.g. `photo.png`
    pub display_name: String,

    /// MIME type derived at staging time, e.g. `image/png`
    pub mime_type: String,

    /// Local path reference for previewable (image) attachments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,

    /// Pixel dimensions probed from image attachments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<(u32, u32)>,
}

/// A single transcript message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Unique message identifier
    pub id: String,

    /// Message author
    pub sender: Sender,

    /// Message body
    pub text: String,

    /// Attachment metadata, present only on user messages that carried one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<AttachmentMeta>,

    /// Creation time (display only; transcript order is vector order)
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a user message, optionally carrying attachment metadata
    pub fn user(text: impl Into<String>, attachment: Option<AttachmentMeta>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender: Sender::User,
            text: text.into(),
            attachment,
            timestamp: Utc::now(),
        }
    }

    /// Create a model message
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender: Sender::Model,
            text: text.into(),
            attachment: None,
            timestamp: Utc::now(),
        }
    }
}
