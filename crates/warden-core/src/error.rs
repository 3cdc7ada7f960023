//! Rule and command validation errors.

use thiserror::Error;

/// Errors raised while validating rule mutations and `/block` invocations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// The category token is not one of the keyword categories.
    #[error("invalid category '{0}': use global, video_photo, animation or sticker")]
    InvalidCategory(String),

    /// The mode token is not one of the documented `/block` modes.
    #[error("invalid mode '{0}': use yes, no, yesedit, noedit or id_only")]
    InvalidMode(String),

    /// Patterns and identities must be non-empty after trimming.
    #[error("value must not be empty")]
    EmptyValue,

    /// The invocation does not match either command form.
    #[error("usage: reply with /block [yes|no|yesedit|noedit], or /block <category> <keyword>")]
    Usage,
}
