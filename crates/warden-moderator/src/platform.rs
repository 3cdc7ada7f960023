//! Platform collaborator traits and reference types.
//!
//! The messaging platform itself (connection, webhooks, update delivery)
//! is an external collaborator. The moderator only needs the small surface
//! below: deleting and sending messages, and looking up a member's status
//! for the admin check.

use async_trait::async_trait;
use thiserror::Error;

/// A user, as identified by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    /// Platform user id.
    pub id: i64,
    /// Username, if the user has one.
    pub username: Option<String>,
    /// Display name, always present.
    pub display_name: String,
}

impl UserRef {
    /// Creates a user reference without a username.
    pub fn new(id: i64, display_name: impl Into<String>) -> Self {
        Self {
            id,
            username: None,
            display_name: display_name.into(),
        }
    }

    /// Sets the username.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// The name recorded in the audit trail: username when present,
    /// display name otherwise.
    pub fn handle(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.display_name)
    }
}

/// Kind of chat a message arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    /// One-on-one chat with the bot; admin checks are skipped here.
    Private,
    /// Group chat.
    Group,
    /// Broadcast channel.
    Channel,
}

/// A chat, as identified by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatRef {
    /// Platform chat id.
    pub id: i64,
    /// Chat kind.
    pub kind: ChatKind,
}

/// A sent or received message, addressable for deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef {
    /// Chat the message lives in.
    pub chat_id: i64,
    /// Message id within the chat.
    pub message_id: i64,
}

/// Membership status of a user in a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberStatus {
    Creator,
    Administrator,
    Member,
    Restricted,
    Left,
    Banned,
}

impl MemberStatus {
    /// Returns true for statuses allowed to issue privileged commands.
    pub fn is_admin(&self) -> bool {
        matches!(self, MemberStatus::Creator | MemberStatus::Administrator)
    }
}

/// A platform API call failed.
#[derive(Debug, Clone, Error)]
#[error("platform call failed: {0}")]
pub struct TransportError(pub String);

/// Outbound actions against the messaging platform.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Deletes a message.
    async fn delete_message(&self, message: MessageRef) -> Result<(), TransportError>;

    /// Sends a text message to a chat, returning a reference to it.
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<MessageRef, TransportError>;

    /// Looks up a user's membership status in a chat.
    async fn member_status(&self, chat_id: i64, user_id: i64)
        -> Result<MemberStatus, TransportError>;
}
