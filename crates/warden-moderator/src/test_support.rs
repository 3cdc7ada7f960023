//! Shared fixtures for the moderator tests: an in-memory backend and a
//! recording mock of the platform API.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use warden_core::MediaItem;
use warden_storage::{AuditLog, RuleCache, RuleStore, SqliteStore};

use crate::message::{CommandInvocation, IncomingMessage, MessageBody};
use crate::moderator::{Moderator, ModeratorConfig};
use crate::platform::{ChatApi, ChatKind, ChatRef, MemberStatus, MessageRef, TransportError, UserRef};

pub const ADMIN_ID: i64 = 7;
pub const CHAT_ID: i64 = 100;
pub const COMMAND_MESSAGE_ID: i64 = 1;
pub const MEDIA_MESSAGE_ID: i64 = 42;

/// Recording mock of the platform API.
pub struct MockChat {
    admin: bool,
    fail_deletes: AtomicBool,
    sent: Mutex<Vec<(MessageRef, String)>>,
    deleted: Mutex<Vec<MessageRef>>,
    next_id: AtomicI64,
}

impl MockChat {
    pub fn new(admin: bool) -> Self {
        Self {
            admin,
            fail_deletes: AtomicBool::new(false),
            sent: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1000),
        }
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<(MessageRef, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<MessageRef> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatApi for MockChat {
    async fn delete_message(&self, message: MessageRef) -> Result<(), TransportError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(TransportError("message not found".into()));
        }
        self.deleted.lock().unwrap().push(message);
        Ok(())
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<MessageRef, TransportError> {
        let sent = MessageRef {
            chat_id,
            message_id: self.next_id.fetch_add(1, Ordering::SeqCst),
        };
        self.sent.lock().unwrap().push((sent, text.to_string()));
        Ok(sent)
    }

    async fn member_status(
        &self,
        _chat_id: i64,
        _user_id: i64,
    ) -> Result<MemberStatus, TransportError> {
        Ok(if self.admin {
            MemberStatus::Administrator
        } else {
            MemberStatus::Member
        })
    }
}

pub fn admin_user() -> UserRef {
    UserRef::new(ADMIN_ID, "Alice").with_username("alice")
}

pub fn group_chat() -> ChatRef {
    ChatRef {
        id: CHAT_ID,
        kind: ChatKind::Group,
    }
}

pub fn block_command(args: &[&str], reply_to: Option<MediaItem>) -> IncomingMessage {
    IncomingMessage {
        chat: group_chat(),
        sender: admin_user(),
        message_id: COMMAND_MESSAGE_ID,
        body: MessageBody::Command(CommandInvocation {
            name: "block".to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            reply_to,
        }),
    }
}

pub fn block_reply(mode: &str, target: MediaItem) -> IncomingMessage {
    block_command(&[mode], Some(target))
}

pub fn media_message(item: MediaItem) -> IncomingMessage {
    IncomingMessage {
        chat: group_chat(),
        sender: admin_user(),
        message_id: MEDIA_MESSAGE_ID,
        body: MessageBody::Media(item),
    }
}

pub fn text_message(message_id: i64, text: &str) -> IncomingMessage {
    IncomingMessage {
        chat: group_chat(),
        sender: admin_user(),
        message_id,
        body: MessageBody::Text(text.to_string()),
    }
}

fn setup_with_admin(admin: bool) -> (Moderator, Arc<MockChat>, Arc<SqliteStore>) {
    let store = Arc::new(SqliteStore::in_memory().unwrap());
    let rule_store: Arc<dyn RuleStore> = store.clone();
    let audit: Arc<dyn AuditLog> = store.clone();
    let cache = Arc::new(RuleCache::new(rule_store));
    let chat = Arc::new(MockChat::new(admin));

    let config = ModeratorConfig {
        ephemeral_reply_ttl: Duration::from_millis(30),
        pending_edit_ttl: Duration::from_millis(500),
        reload_interval: Duration::from_millis(20),
    };
    let moderator = Moderator::with_config(cache, audit, chat.clone(), config);
    (moderator, chat, store)
}

/// Moderator over an in-memory backend, with the sender as a group admin.
pub async fn setup() -> (Moderator, Arc<MockChat>, Arc<SqliteStore>) {
    setup_with_admin(true)
}

/// Same, but the sender is an ordinary member.
pub async fn setup_non_admin() -> (Moderator, Arc<MockChat>, Arc<SqliteStore>) {
    setup_with_admin(false)
}
