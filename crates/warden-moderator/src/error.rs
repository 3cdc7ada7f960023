//! Moderation error types.
//!
//! Every variant renders as the message reported back to the acting admin;
//! none of them is fatal to the process.

use thiserror::Error;

use warden_core::RuleError;
use warden_storage::StorageError;

use crate::platform::TransportError;

/// Errors from handling an admin command.
#[derive(Debug, Error)]
pub enum ModerationError {
    /// A privileged command was issued by a non-admin in a group.
    #[error("this command is only for administrators")]
    Unauthorized,

    /// The replied-to message carries neither an identity nor a filename.
    #[error("no content id or filename found on the replied-to message")]
    NoIdentifiableContent,

    /// The invocation failed validation; nothing was mutated.
    #[error(transparent)]
    Validation(#[from] RuleError),

    /// The durable backend rejected the write; the cache is unchanged.
    #[error("could not update rules: {0}")]
    Storage(#[from] StorageError),

    /// A platform call failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}
