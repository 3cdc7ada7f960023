//! The moderation pipeline.
//!
//! [`Moderator::handle`] is the single entry point for inbound messages:
//! admin commands go through the command protocol, plain text may consume a
//! pending edit, and everything else is matched against the current rule
//! snapshot. A delete verdict is executed best-effort: the platform call
//! failing is logged and never revisits the decision.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use warden_core::{evaluate, MediaItem, PendingEditRegistry, Verdict, BLOCK_COMMAND};
use warden_storage::{AuditEntry, AuditLog, RuleCache, RuleStore as _};

use crate::maintenance;
use crate::message::{IncomingMessage, MessageBody};
use crate::platform::{ChatApi, ChatKind, ChatRef, MessageRef, UserRef};
use crate::ModerationError;

/// Tunable timings of the moderation pipeline.
#[derive(Debug, Clone)]
pub struct ModeratorConfig {
    /// How long admin-facing replies (and the commands that caused them)
    /// stay visible before the cleanup task removes them.
    pub ephemeral_reply_ttl: Duration,
    /// Time-to-live of a registered pending edit.
    pub pending_edit_ttl: Duration,
    /// Interval of the external-change poll over the rule store.
    pub reload_interval: Duration,
}

impl Default for ModeratorConfig {
    fn default() -> Self {
        Self {
            ephemeral_reply_ttl: Duration::from_secs(5),
            pending_edit_ttl: warden_core::DEFAULT_PENDING_TTL,
            reload_interval: Duration::from_secs(2),
        }
    }
}

/// The moderation service.
pub struct Moderator {
    cache: Arc<RuleCache>,
    audit: Arc<dyn AuditLog>,
    chat: Arc<dyn ChatApi>,
    pending: Arc<PendingEditRegistry>,
    config: ModeratorConfig,
}

impl Moderator {
    /// Creates a moderator with default timings.
    pub fn new(cache: Arc<RuleCache>, audit: Arc<dyn AuditLog>, chat: Arc<dyn ChatApi>) -> Self {
        Self::with_config(cache, audit, chat, ModeratorConfig::default())
    }

    /// Creates a moderator with custom timings.
    pub fn with_config(
        cache: Arc<RuleCache>,
        audit: Arc<dyn AuditLog>,
        chat: Arc<dyn ChatApi>,
        config: ModeratorConfig,
    ) -> Self {
        Self {
            cache,
            audit,
            chat,
            pending: Arc::new(PendingEditRegistry::with_ttl(config.pending_edit_ttl)),
            config,
        }
    }

    /// The rule cache, for wiring maintenance tasks.
    pub fn cache(&self) -> &Arc<RuleCache> {
        &self.cache
    }

    /// The pending-edit registry, for wiring maintenance tasks.
    pub fn pending(&self) -> &Arc<PendingEditRegistry> {
        &self.pending
    }

    /// The configured timings.
    pub fn config(&self) -> &ModeratorConfig {
        &self.config
    }

    /// Spawns the background maintenance loops with the configured
    /// timings: the external-change poll and the pending-edit sweep.
    pub fn spawn_maintenance(&self) -> Vec<tokio::task::JoinHandle<()>> {
        vec![
            maintenance::spawn_rule_reload(Arc::clone(&self.cache), self.config.reload_interval),
            maintenance::spawn_pending_sweep(Arc::clone(&self.pending), self.config.pending_edit_ttl),
        ]
    }

    /// Processes one inbound message end to end.
    pub async fn handle(&self, message: IncomingMessage) {
        match &message.body {
            MessageBody::Command(cmd) if cmd.name == BLOCK_COMMAND => {
                let reply = match self.handle_block(&message, cmd).await {
                    Ok(text) => text,
                    Err(e) => {
                        warn!(
                            chat = message.chat.id,
                            user = message.sender.id,
                            "block command rejected: {e}"
                        );
                        e.to_string()
                    }
                };
                self.send_ephemeral(message.chat.id, &reply).await;
                self.schedule_delete(message.message_ref());
            }
            MessageBody::Command(cmd) => {
                debug!(command = %cmd.name, "ignoring unknown command");
            }
            MessageBody::Text(text) => {
                if self.try_consume_pending(&message, text).await {
                    return;
                }
                self.moderate(&message, &MediaItem::text(text.clone())).await;
            }
            MessageBody::Media(item) => {
                self.moderate(&message, item).await;
            }
        }
    }

    /// Checks an item against the current snapshot and executes a delete
    /// verdict best-effort.
    async fn moderate(&self, message: &IncomingMessage, item: &MediaItem) {
        let rules = self.cache.current();
        match evaluate(item, &rules) {
            Verdict::Allow => {
                debug!(
                    chat = message.chat.id,
                    kind = item.kind.label(),
                    "content allowed"
                );
            }
            Verdict::Delete(reason) => {
                match self.chat.delete_message(message.message_ref()).await {
                    Ok(()) => {
                        info!(
                            chat = message.chat.id,
                            user = message.sender.id,
                            %reason,
                            "deleted message"
                        );
                        self.audit.append(AuditEntry::new(
                            message.sender.id,
                            message.sender.handle(),
                            item.kind.label(),
                            reason.to_string(),
                            &item.searchable_text(),
                        ));
                        self.send_ephemeral(
                            message.chat.id,
                            &format!("message deleted: {reason}"),
                        )
                        .await;
                    }
                    Err(e) => {
                        error!(
                            chat = message.chat.id,
                            message_id = message.message_id,
                            "failed to delete message: {e}"
                        );
                    }
                }
            }
        }
    }

    /// Consumes a pending edit if the sender has one, adding the message
    /// text as a keyword to the registered category. Returns true when the
    /// message was consumed as a pending edit.
    async fn try_consume_pending(&self, message: &IncomingMessage, text: &str) -> bool {
        let Some(edit) = self.pending.consume(message.sender.id) else {
            return false;
        };

        let keyword = warden_core::normalize_keyword(text);
        let reply = match self.cache.store().add_pattern(edit.category, &keyword) {
            Ok(outcome) => {
                self.cache.refresh();
                if outcome.was_added() {
                    format!("added '{keyword}' to {}", edit.category)
                } else {
                    format!("'{keyword}' already exists in {}", edit.category)
                }
            }
            Err(e) => {
                warn!(user = message.sender.id, "pending keyword rejected: {e}");
                format!("could not update rules: {e}")
            }
        };

        self.send_ephemeral(message.chat.id, &reply).await;
        self.schedule_delete(message.message_ref());
        true
    }

    /// Verifies the sender may issue privileged commands in this chat.
    ///
    /// Private chats skip the check. The membership lookup is retried once
    /// before the failure surfaces.
    pub(crate) async fn ensure_admin(
        &self,
        chat: &ChatRef,
        user: &UserRef,
    ) -> Result<(), ModerationError> {
        if chat.kind == ChatKind::Private {
            return Ok(());
        }

        let status = match self.chat.member_status(chat.id, user.id).await {
            Ok(status) => status,
            Err(first) => {
                debug!(chat = chat.id, "member status lookup failed, retrying: {first}");
                self.chat.member_status(chat.id, user.id).await?
            }
        };

        if status.is_admin() {
            Ok(())
        } else {
            Err(ModerationError::Unauthorized)
        }
    }

    /// Sends a short-lived reply and schedules its removal.
    pub(crate) async fn send_ephemeral(&self, chat_id: i64, text: &str) {
        match self.chat.send_message(chat_id, text).await {
            Ok(sent) => self.schedule_delete(sent),
            Err(e) => warn!(chat = chat_id, "failed to send reply: {e}"),
        }
    }

    /// Detached best-effort deletion after the ephemeral TTL. Failures are
    /// swallowed and logged; the moderation outcome is already final.
    pub(crate) fn schedule_delete(&self, message: MessageRef) {
        let chat = Arc::clone(&self.chat);
        let delay = self.config.ephemeral_reply_ttl;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = chat.delete_message(message).await {
                debug!(
                    chat = message.chat_id,
                    message_id = message.message_id,
                    "ephemeral cleanup failed: {e}"
                );
            }
        });
    }
}
