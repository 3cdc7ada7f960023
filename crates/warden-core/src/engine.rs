//! Moderation decision engine.
//!
//! [`evaluate`] is a pure function from a classified item and a rule
//! snapshot to a keep/delete verdict. Evaluation order, short-circuiting:
//!
//! 1. Whitelisted identity: allow.
//! 2. Blocked identity: delete.
//! 3. Keyword patterns for the item's category, then the global patterns,
//!    matched as lower-cased substrings of the searchable text; the first
//!    match wins.
//! 4. Otherwise allow.

use std::fmt;

use crate::media::{MediaItem, MediaKind};
use crate::rules::RuleSet;

/// Why an item was deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchReason {
    /// The content identity is on the blocked list.
    IdentityBlocked {
        /// The matched identity.
        content_id: String,
    },
    /// A keyword pattern matched the searchable text.
    Keyword {
        /// The pattern that matched, as stored.
        pattern: String,
        /// The kind of content it matched in.
        kind: MediaKind,
    },
}

impl fmt::Display for MatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchReason::IdentityBlocked { .. } => write!(f, "identity manually blocked"),
            MatchReason::Keyword { pattern, kind } => {
                write!(f, "keyword '{pattern}' matched in {kind}")
            }
        }
    }
}

/// The decision for a single item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Keep the message.
    Allow,
    /// Delete the message for the given reason.
    Delete(MatchReason),
}

impl Verdict {
    /// Returns true if the item should be deleted.
    pub fn is_delete(&self) -> bool {
        matches!(self, Verdict::Delete(_))
    }

    /// Returns the deletion reason, if any.
    pub fn reason(&self) -> Option<&MatchReason> {
        match self {
            Verdict::Allow => None,
            Verdict::Delete(reason) => Some(reason),
        }
    }
}

/// Decides whether an item should be kept or deleted under the given rules.
pub fn evaluate(item: &MediaItem, rules: &RuleSet) -> Verdict {
    if let Some(id) = &item.content_id {
        if rules.is_whitelisted(id) {
            return Verdict::Allow;
        }
        if rules.is_blocked(id) {
            return Verdict::Delete(MatchReason::IdentityBlocked {
                content_id: id.clone(),
            });
        }
    }

    let text = item.searchable_text();
    if text.is_empty() {
        return Verdict::Allow;
    }

    for pattern in rules.keyword_chain(item.kind.keyword_category()) {
        if text.contains(&pattern.to_lowercase()) {
            return Verdict::Delete(MatchReason::Keyword {
                pattern: pattern.clone(),
                kind: item.kind,
            });
        }
    }

    Verdict::Allow
}
