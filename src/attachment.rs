//! Attachment staging and preprocessing for Visor
//!
//! This module handles everything between "the user named a file" and "the
//! provider receives a payload": MIME classification, image dimension
//! probing, size-capped reads, base64 encoding for the inline image branch,
//! and the document-grounded combined prompt for the text branch.

use crate::error::{Result, VisorError};
use crate::message::AttachmentMeta;
use crate::providers::InlineData;
use base64::Engine;
use std::io::Read;
use std::path::{Path, PathBuf};

/// A staged attachment: the file the next submitted turn will carry
///
/// Staging records metadata only. The file bytes are read during the turn,
/// so a file that disappears between staging and submission surfaces as a
/// failed turn rather than a failed staging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedAttachment {
    /// Path the attachment was staged from
    pub path: PathBuf,

    /// Original file name, e.g. `photo.png`
    pub file_name: String,

    /// MIME type classified at staging time
    pub mime_type: String,

    /// Pixel dimensions, probed for image attachments
    pub dimensions: Option<(u32, u32)>,
}

impl StagedAttachment {
    /// Stage a local file as the attachment for the next turn
    ///
    /// Verifies the path names an existing regular file, derives the file
    /// name, classifies the MIME type, and probes image dimensions. A
    /// failed dimension probe downgrades to no dimensions; it does not
    /// fail staging.
    ///
    /// # Errors
    ///
    /// Returns `VisorError::Attachment` if the path does not exist, is not
    /// a regular file, or has no file name component.
    pub fn stage(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let metadata = std::fs::metadata(path)
            .map_err(|_| VisorError::Attachment(format!("Attachment not found: {}", path.display())))?;
        if !metadata.is_file() {
            return Err(VisorError::Attachment(format!(
                "Attachment is not a regular file: {}",
                path.display()
            ))
            .into());
        }

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.to_string())
            .ok_or_else(|| {
                VisorError::Attachment(format!(
                    "Attachment path has no file name: {}",
                    path.display()
                ))
            })?;

        let mime_type = classify_mime(path);

        let dimensions = if is_image_mime(&mime_type) {
            match image::image_dimensions(path) {
                Ok(dims) => Some(dims),
                Err(e) => {
                    tracing::debug!("Could not probe dimensions for {}: {}", path.display(), e);
                    None
                }
            }
        } else {
            None
        };

        tracing::debug!(
            "Staged attachment '{}' as {} ({} bytes)",
            file_name,
            mime_type,
            metadata.len()
        );

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            mime_type,
            dimensions,
        })
    }

    /// Whether this attachment takes the inline-image branch on submission
    pub fn is_image(&self) -> bool {
        is_image_mime(&self.mime_type)
    }

    /// Transcript metadata for the user message carrying this attachment
    ///
    /// Image attachments keep a preview reference back to the local path;
    /// text attachments do not.
    pub fn meta(&self) -> AttachmentMeta {
        AttachmentMeta {
            display_name: self.file_name.clone(),
            mime_type: self.mime_type.clone(),
            preview: if self.is_image() {
                Some(self.path.display().to_string())
            } else {
                None
            },
            dimensions: self.dimensions,
        }
    }
}

/// Classify the MIME type of a file
///
/// Known extensions map directly. Files with an unrecognized extension are
/// sniffed by magic bytes in case they are images saved without one;
/// everything else is treated as plain text and takes the text branch.
pub fn classify_mime(path: &Path) -> String {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());

    if let Some(ext) = extension {
        if let Some(mime) = mime_for_extension(&ext) {
            return mime.to_string();
        }
    }

    if let Some(mime) = sniff_image_mime(path) {
        return mime.to_string();
    }

    "text/plain".to_string()
}

/// MIME type for a known (lowercased) file extension
fn mime_for_extension(extension: &str) -> Option<&'static str> {
    match extension {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "txt" => Some("text/plain"),
        "md" => Some("text/markdown"),
        "js" => Some("text/javascript"),
        "py" => Some("text/x-python"),
        "html" => Some("text/html"),
        "css" => Some("text/css"),
        "json" => Some("application/json"),
        _ => None,
    }
}

/// Sniff an image MIME type from a file's magic bytes
///
/// Reads only a small prefix. Returns None for unreadable files and for
/// anything that is not a recognized image signature.
fn sniff_image_mime(path: &Path) -> Option<&'static str> {
    let mut prefix = [0u8; 16];
    let mut file = std::fs::File::open(path).ok()?;
    let read = file.read(&mut prefix).ok()?;
    let prefix = &prefix[..read];

    if prefix.starts_with(b"\x89PNG") {
        Some("image/png")
    } else if prefix.starts_with(b"\xff\xd8\xff") {
        Some("image/jpeg")
    } else if prefix.starts_with(b"RIFF") && prefix.len() >= 12 && &prefix[8..12] == b"WEBP" {
        Some("image/webp")
    } else if prefix.starts_with(b"GIF87a") || prefix.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if prefix.starts_with(b"BM") {
        Some("image/bmp")
    } else {
        None
    }
}

/// Whether a MIME type takes the inline-image branch
pub fn is_image_mime(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
}

/// Read the bytes of a staged attachment, enforcing the size cap
///
/// # Arguments
///
/// * `staged` - The staged attachment to read
/// * `max_bytes` - Configured attachment size limit
///
/// # Errors
///
/// Returns `VisorError::Attachment` if the file cannot be read or exceeds
/// the size limit.
pub async fn load_bytes(staged: &StagedAttachment, max_bytes: usize) -> Result<Vec<u8>> {
    let metadata = tokio::fs::metadata(&staged.path).await.map_err(|e| {
        VisorError::Attachment(format!(
            "Failed to read attachment '{}': {}",
            staged.file_name, e
        ))
    })?;

    if metadata.len() > max_bytes as u64 {
        return Err(VisorError::Attachment(format!(
            "Attachment '{}' is {} bytes, exceeding the {} byte limit",
            staged.file_name,
            metadata.len(),
            max_bytes
        ))
        .into());
    }

    tokio::fs::read(&staged.path).await.map_err(|e| {
        VisorError::Attachment(format!(
            "Failed to read attachment '{}': {}",
            staged.file_name, e
        ))
        .into()
    })
}

/// Encode attachment bytes as an inline payload for the image branch
pub fn encode_inline(mime_type: &str, bytes: &[u8]) -> InlineData {
    InlineData {
        mime_type: mime_type.to_string(),
        data: base64::engine::general_purpose::STANDARD.encode(bytes),
    }
}

/// Decode attachment bytes as UTF-8 text for the text branch
///
/// # Errors
///
/// Returns `VisorError::Attachment` if the bytes are not valid UTF-8.
pub fn decode_text(file_name: &str, bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|_| {
        VisorError::Attachment(format!("Attachment '{}' is not valid UTF-8 text", file_name)).into()
    })
}

/// Build the document-grounded combined prompt for the text branch
///
/// The file name, file content, and the user's question appear in that
/// order so the model answers the question against the document.
pub fn document_prompt(file_name: &str, content: &str, question: &str) -> String {
    format!(
        "Based on the following document content, please answer the user's question.\n\n\
         Document: \"{}\"\n\
         ---\n\
         {}\n\
         ---\n\
         Question: {}",
        file_name, content, question
    )
}
