//! Classified inbound content.
//!
//! The platform layer classifies each inbound message into a [`MediaItem`];
//! the engine only ever sees this shape, never the raw platform update.

use serde::{Deserialize, Serialize};

use crate::normalize::clean_filename;
use crate::rules::RuleCategory;

/// The media kinds the platform classifies for us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Photo,
    Video,
    Animation,
    /// A document with an `image/*` MIME type.
    DocumentImage,
    /// A document with a `video/*` MIME type.
    DocumentVideo,
    /// A document with an `audio/*` MIME type.
    DocumentAudio,
    /// Any other document.
    Document,
    Sticker,
    /// A plain text message.
    Text,
}

impl MediaKind {
    /// Human-readable label, as recorded in the audit trail.
    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
            MediaKind::Animation => "animation",
            MediaKind::DocumentImage => "photo (file)",
            MediaKind::DocumentVideo => "video (file)",
            MediaKind::DocumentAudio => "audio",
            MediaKind::Document => "document",
            MediaKind::Sticker => "sticker",
            MediaKind::Text => "text",
        }
    }

    /// The keyword category this kind is checked against (in addition to
    /// the global list). Kinds with no specific category map to global.
    pub fn keyword_category(&self) -> RuleCategory {
        match self {
            MediaKind::Photo
            | MediaKind::Video
            | MediaKind::DocumentImage
            | MediaKind::DocumentVideo => RuleCategory::VideoPhoto,
            MediaKind::Animation => RuleCategory::Animation,
            MediaKind::Sticker => RuleCategory::Sticker,
            MediaKind::DocumentAudio | MediaKind::Document | MediaKind::Text => {
                RuleCategory::Global
            }
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A classified piece of inbound content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    /// Classified media kind.
    pub kind: MediaKind,
    /// Platform-assigned content identity, stable across re-sends.
    pub content_id: Option<String>,
    /// Original filename, if the platform exposes one.
    pub file_name: Option<String>,
    /// Caption text, if present.
    pub caption: Option<String>,
    /// Owning sticker pack name, for stickers.
    pub sticker_pack: Option<String>,
    /// Sticker emoji, for stickers.
    pub sticker_emoji: Option<String>,
}

impl MediaItem {
    /// Creates an item of the given kind with no attributes.
    pub fn new(kind: MediaKind) -> Self {
        Self {
            kind,
            content_id: None,
            file_name: None,
            caption: None,
            sticker_pack: None,
            sticker_emoji: None,
        }
    }

    /// Creates a plain-text item from message text.
    pub fn text(body: impl Into<String>) -> Self {
        Self::new(MediaKind::Text).with_caption(body)
    }

    /// Sets the content identity.
    pub fn with_content_id(mut self, id: impl Into<String>) -> Self {
        self.content_id = Some(id.into());
        self
    }

    /// Sets the filename.
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Sets the caption.
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Sets the sticker pack name.
    pub fn with_sticker_pack(mut self, pack: impl Into<String>) -> Self {
        self.sticker_pack = Some(pack.into());
        self
    }

    /// Sets the sticker emoji.
    pub fn with_sticker_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.sticker_emoji = Some(emoji.into());
        self
    }

    /// Builds the lower-cased text that keyword patterns are matched
    /// against: the cleaned filename followed by the caption, and for
    /// stickers the pack name and emoji.
    pub fn searchable_text(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        if let Some(name) = &self.file_name {
            let cleaned = clean_filename(name);
            if !cleaned.is_empty() {
                parts.push(cleaned);
            }
        }
        if let Some(caption) = &self.caption {
            let trimmed = caption.trim();
            if !trimmed.is_empty() {
                parts.push(trimmed.to_string());
            }
        }
        if self.kind == MediaKind::Sticker {
            if let Some(pack) = &self.sticker_pack {
                parts.push(pack.clone());
            }
            if let Some(emoji) = &self.sticker_emoji {
                parts.push(emoji.clone());
            }
        }

        parts.join(" ").to_lowercase()
    }
}
