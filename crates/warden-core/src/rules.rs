//! Rule set data model.
//!
//! A [`RuleSet`] is the singleton rule document: four keyword categories
//! matched as case-insensitive substrings, plus two identity lists matched
//! exactly. Missing lists are materialized empty on deserialization so a
//! loaded document always carries all six.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RuleError;

/// The six named lists of a [`RuleSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    /// Keywords checked against every content kind.
    Global,
    /// Keywords for photos, videos, and image/video documents.
    VideoPhoto,
    /// Keywords for animations/GIFs.
    Animation,
    /// Keywords (and pack names) for stickers.
    Sticker,
    /// Content identities that are always allowed.
    WhitelistedIds,
    /// Content identities that are always deleted.
    BlockedIds,
}

impl RuleCategory {
    /// The categories that hold keyword patterns, in document order.
    pub const KEYWORD_CATEGORIES: [RuleCategory; 4] = [
        RuleCategory::Global,
        RuleCategory::VideoPhoto,
        RuleCategory::Animation,
        RuleCategory::Sticker,
    ];

    /// Returns the document field name for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleCategory::Global => "global",
            RuleCategory::VideoPhoto => "video_photo",
            RuleCategory::Animation => "animation",
            RuleCategory::Sticker => "sticker",
            RuleCategory::WhitelistedIds => "whitelisted_ids",
            RuleCategory::BlockedIds => "blocked_ids",
        }
    }

    /// Parses any of the six category names, case-insensitively.
    pub fn parse(token: &str) -> Option<RuleCategory> {
        match token.to_lowercase().as_str() {
            "global" => Some(RuleCategory::Global),
            "video_photo" => Some(RuleCategory::VideoPhoto),
            "animation" => Some(RuleCategory::Animation),
            "sticker" => Some(RuleCategory::Sticker),
            "whitelisted_ids" => Some(RuleCategory::WhitelistedIds),
            "blocked_ids" => Some(RuleCategory::BlockedIds),
            _ => None,
        }
    }

    /// Parses a keyword category token as used by the text-mode command.
    ///
    /// Identity lists are not valid targets for keyword additions.
    pub fn parse_keyword(token: &str) -> Result<RuleCategory, RuleError> {
        match RuleCategory::parse(token) {
            Some(cat) if !cat.is_identity_list() => Ok(cat),
            _ => Err(RuleError::InvalidCategory(token.to_string())),
        }
    }

    /// Returns true for the exact-match identity lists.
    pub fn is_identity_list(&self) -> bool {
        matches!(
            self,
            RuleCategory::WhitelistedIds | RuleCategory::BlockedIds
        )
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of an idempotent add into a rule list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The value was appended.
    Added,
    /// An equivalent value was already present; the list is unchanged.
    AlreadyExists,
}

impl AddOutcome {
    /// Returns true if the value was appended.
    pub fn was_added(&self) -> bool {
        matches!(self, AddOutcome::Added)
    }
}

/// The singleton rule document.
///
/// Field names match the persisted JSON document. Insertion order is
/// preserved so the management surface can address entries by index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Keywords checked against every content kind.
    #[serde(default)]
    pub global: Vec<String>,
    /// Keywords for photos, videos, and image/video documents.
    #[serde(default)]
    pub video_photo: Vec<String>,
    /// Keywords for animations/GIFs.
    #[serde(default)]
    pub animation: Vec<String>,
    /// Keywords and pack names for stickers.
    #[serde(default)]
    pub sticker: Vec<String>,
    /// Content identities that are always allowed.
    #[serde(default)]
    pub whitelisted_ids: Vec<String>,
    /// Content identities that are always deleted.
    #[serde(default)]
    pub blocked_ids: Vec<String>,
}

impl RuleSet {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the list for a category.
    pub fn list(&self, category: RuleCategory) -> &[String] {
        match category {
            RuleCategory::Global => &self.global,
            RuleCategory::VideoPhoto => &self.video_photo,
            RuleCategory::Animation => &self.animation,
            RuleCategory::Sticker => &self.sticker,
            RuleCategory::WhitelistedIds => &self.whitelisted_ids,
            RuleCategory::BlockedIds => &self.blocked_ids,
        }
    }

    /// Returns a mutable reference to the list for a category.
    pub fn list_mut(&mut self, category: RuleCategory) -> &mut Vec<String> {
        match category {
            RuleCategory::Global => &mut self.global,
            RuleCategory::VideoPhoto => &mut self.video_photo,
            RuleCategory::Animation => &mut self.animation,
            RuleCategory::Sticker => &mut self.sticker,
            RuleCategory::WhitelistedIds => &mut self.whitelisted_ids,
            RuleCategory::BlockedIds => &mut self.blocked_ids,
        }
    }

    /// Checks whether an equivalent value is already present.
    ///
    /// Keyword categories compare case-insensitively, identity lists exactly.
    pub fn contains(&self, category: RuleCategory, value: &str) -> bool {
        let list = self.list(category);
        if category.is_identity_list() {
            list.iter().any(|v| v == value)
        } else {
            let needle = value.to_lowercase();
            list.iter().any(|v| v.to_lowercase() == needle)
        }
    }

    /// Idempotently appends a value to a category.
    pub fn add(&mut self, category: RuleCategory, value: &str) -> AddOutcome {
        if self.contains(category, value) {
            AddOutcome::AlreadyExists
        } else {
            self.list_mut(category).push(value.to_string());
            AddOutcome::Added
        }
    }

    /// Returns true if the identity is whitelisted.
    pub fn is_whitelisted(&self, content_id: &str) -> bool {
        self.whitelisted_ids.iter().any(|v| v == content_id)
    }

    /// Returns true if the identity is blocked.
    pub fn is_blocked(&self, content_id: &str) -> bool {
        self.blocked_ids.iter().any(|v| v == content_id)
    }

    /// Iterates the effective pattern list for a keyword category:
    /// category-specific patterns first, then the global patterns.
    pub fn keyword_chain(&self, category: RuleCategory) -> impl Iterator<Item = &String> {
        let specific: &[String] = if category == RuleCategory::Global {
            &[]
        } else {
            self.list(category)
        };
        specific.iter().chain(self.global.iter())
    }
}
