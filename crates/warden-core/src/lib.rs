//! Warden Core - Rule model, match engine, and command grammar.
//!
//! This crate holds the pure domain logic of the Warden moderation engine:
//! the rule set data model, the classification of inbound media, the
//! keep/delete decision function, the `/block` command grammar, and the
//! short-lived pending-edit registry. Nothing here performs I/O; persistence
//! and platform calls live in `warden-storage` and `warden-moderator`.

pub mod command;
pub mod engine;
pub mod error;
pub mod media;
pub mod normalize;
pub mod pending;
pub mod rules;

pub use command::{parse_reply_mode, parse_text_mode, BlockMode, KeywordAddition, BLOCK_COMMAND};
pub use engine::{evaluate, MatchReason, Verdict};
pub use error::RuleError;
pub use media::{MediaItem, MediaKind};
pub use normalize::{clean_filename, normalize_keyword};
pub use pending::{PendingEdit, PendingEditRegistry, DEFAULT_PENDING_TTL};
pub use rules::{AddOutcome, RuleCategory, RuleSet};
