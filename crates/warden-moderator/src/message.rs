//! Inbound message model.
//!
//! The excluded transport layer turns each platform update into an
//! [`IncomingMessage`] before handing it to the moderator.

use warden_core::MediaItem;

use crate::platform::{ChatRef, MessageRef, UserRef};

/// A classified inbound message.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    /// Chat the message arrived in.
    pub chat: ChatRef,
    /// The sender.
    pub sender: UserRef,
    /// Platform message id.
    pub message_id: i64,
    /// The message payload.
    pub body: MessageBody,
}

impl IncomingMessage {
    /// This message as a deletable reference.
    pub fn message_ref(&self) -> MessageRef {
        MessageRef {
            chat_id: self.chat.id,
            message_id: self.message_id,
        }
    }
}

/// Payload of an inbound message.
#[derive(Debug, Clone)]
pub enum MessageBody {
    /// A slash command, possibly issued as a reply.
    Command(CommandInvocation),
    /// A plain text message.
    Text(String),
    /// A media message.
    Media(MediaItem),
}

/// A parsed slash-command invocation.
#[derive(Debug, Clone)]
pub struct CommandInvocation {
    /// Command name without the leading slash.
    pub name: String,
    /// Whitespace-split arguments after the command name.
    pub args: Vec<String>,
    /// The replied-to message's content, when issued as a reply.
    pub reply_to: Option<MediaItem>,
}
