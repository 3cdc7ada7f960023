//! Warden Moderator - moderation pipeline and admin command protocol.
//!
//! This crate ties the rule model and storage layers to a messaging
//! platform behind the small [`ChatApi`] trait:
//!
//! - [`Moderator::handle`] processes each inbound message: admin `/block`
//!   commands mutate the rule store, plain text may consume a pending
//!   keyword edit, and content is matched against the cached rule snapshot
//!   with delete verdicts executed best-effort and recorded in the audit
//!   trail.
//! - [`maintenance`] holds the detached background loops: polling the
//!   store for external edits and sweeping expired pending edits.
//!
//! The platform transport itself (connection, webhook registration, update
//! delivery) is an external collaborator that constructs
//! [`IncomingMessage`] values and owns a `ChatApi` implementation.

pub mod error;
pub mod maintenance;
pub mod message;
mod moderator;
pub mod platform;
mod protocol;

#[cfg(test)]
mod test_support;

pub use error::ModerationError;
pub use maintenance::{spawn_pending_sweep, spawn_rule_reload};
pub use message::{CommandInvocation, IncomingMessage, MessageBody};
pub use moderator::{Moderator, ModeratorConfig};
pub use platform::{
    ChatApi, ChatKind, ChatRef, MemberStatus, MessageRef, TransportError, UserRef,
};
