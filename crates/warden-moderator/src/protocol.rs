//! The `/block` command protocol.
//!
//! Two forms, both admin-only outside private chats:
//!
//! - **Reply form**: blocks the replied-to message's content identity
//!   and/or filename according to the mode token, or registers a pending
//!   keyword edit for the `...edit` modes. A sticker with a named pack
//!   always gets its pack name appended to the sticker category.
//! - **Text form**: `/block <category> <keyword...>` adds a keyword
//!   directly.
//!
//! Every path is an idempotent add through the rule store; the returned
//! string is the admin-facing outcome report.

use tracing::info;

use warden_core::{
    clean_filename, parse_reply_mode, parse_text_mode, AddOutcome, MediaItem, MediaKind,
    RuleCategory,
};
use warden_storage::RuleStore as _;

use crate::message::{CommandInvocation, IncomingMessage};
use crate::moderator::Moderator;
use crate::ModerationError;

impl Moderator {
    /// Handles a `/block` invocation, returning the reply for the admin.
    pub(crate) async fn handle_block(
        &self,
        message: &IncomingMessage,
        cmd: &CommandInvocation,
    ) -> Result<String, ModerationError> {
        self.ensure_admin(&message.chat, &message.sender).await?;

        match &cmd.reply_to {
            Some(target) => self.block_reply_target(message, target, &cmd.args),
            None => self.block_keyword(&cmd.args),
        }
    }

    /// Reply form: block the target's identity and/or filename per mode.
    fn block_reply_target(
        &self,
        message: &IncomingMessage,
        target: &MediaItem,
        args: &[String],
    ) -> Result<String, ModerationError> {
        let mode = parse_reply_mode(args)?;
        let store = self.cache().store();

        // A sticker with a named pack is blocked by pack name, whatever
        // the mode says.
        if target.kind == MediaKind::Sticker {
            if let Some(pack) = &target.sticker_pack {
                let outcome = store.add_pattern(RuleCategory::Sticker, pack)?;
                self.cache().refresh();
                info!(user = message.sender.id, pack = %pack, "sticker pack block");
                return Ok(match outcome {
                    AddOutcome::Added => format!("blocked sticker pack '{pack}'"),
                    AddOutcome::AlreadyExists => {
                        format!("sticker pack '{pack}' is already blocked")
                    }
                });
            }
        }

        if target.content_id.is_none() && target.file_name.is_none() {
            return Err(ModerationError::NoIdentifiableContent);
        }

        let category = target.kind.keyword_category();
        let mut lines = Vec::new();

        if mode.blocks_identity() {
            match &target.content_id {
                Some(id) => match store.add_pattern(RuleCategory::BlockedIds, id)? {
                    AddOutcome::Added => lines.push(format!("blocked content id '{id}'")),
                    AddOutcome::AlreadyExists => {
                        lines.push("content id is already blocked".to_string())
                    }
                },
                None => lines.push("target has no content id, skipped the id block".to_string()),
            }
        } else {
            lines.push("skipped the content id block".to_string());
        }

        if mode.requests_edit() {
            self.pending()
                .register(message.sender.id, category, message.chat.id);
            lines.push(format!("send the keyword or phrase to add to {category}"));
        } else if mode.blocks_filename() {
            if let Some(name) = &target.file_name {
                let cleaned = clean_filename(name);
                if cleaned.is_empty() {
                    lines.push("filename yields no usable keyword".to_string());
                } else {
                    match store.add_pattern(category, &cleaned)? {
                        AddOutcome::Added => {
                            lines.push(format!("also blocked filename '{cleaned}'"))
                        }
                        AddOutcome::AlreadyExists => {
                            lines.push(format!("filename '{cleaned}' is already blocked"))
                        }
                    }
                }
            }
        }

        self.cache().refresh();
        info!(
            user = message.sender.id,
            chat = message.chat.id,
            "block command applied"
        );
        Ok(lines.join("\n"))
    }

    /// Text form: add a keyword to a category directly.
    fn block_keyword(&self, args: &[String]) -> Result<String, ModerationError> {
        let addition = parse_text_mode(args)?;
        let outcome = self
            .cache()
            .store()
            .add_pattern(addition.category, &addition.keyword)?;
        self.cache().refresh();

        Ok(if outcome.was_added() {
            format!("added '{}' to {}", addition.keyword, addition.category)
        } else {
            format!("'{}' already exists in {}", addition.keyword, addition.category)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        block_command, block_reply, media_message, setup, setup_non_admin, text_message,
        MEDIA_MESSAGE_ID,
    };
    use warden_storage::RuleStore;

    #[tokio::test]
    async fn text_mode_adds_keyword_and_photo_matches_it() {
        let (moderator, chat, store) = setup().await;

        moderator
            .handle(block_command(&["global", "spamword"], None))
            .await;
        assert_eq!(store.load().global, vec!["spamword"]);
        assert!(chat.sent()[0].1.contains("added 'spamword' to global"));

        let photo = MediaItem::new(MediaKind::Photo).with_caption("this is spamword");
        moderator.handle(media_message(photo)).await;
        assert!(chat
            .deleted()
            .iter()
            .any(|m| m.message_id == MEDIA_MESSAGE_ID));
    }

    #[tokio::test]
    async fn text_mode_duplicate_reports_already_exists() {
        let (moderator, chat, store) = setup().await;
        store.add_pattern(RuleCategory::Global, "spam").unwrap();

        moderator.handle(block_command(&["global", "SPAM"], None)).await;

        assert_eq!(store.load().global, vec!["spam"]);
        assert!(chat.sent()[0].1.contains("already exists"));
    }

    #[tokio::test]
    async fn text_mode_rejects_invalid_category() {
        let (moderator, chat, store) = setup().await;

        moderator
            .handle(block_command(&["photos", "spam"], None))
            .await;

        assert_eq!(store.load(), Default::default());
        assert!(chat.sent()[0].1.contains("invalid category"));
    }

    #[tokio::test]
    async fn text_mode_requires_keyword() {
        let (moderator, chat, _store) = setup().await;

        moderator.handle(block_command(&["global"], None)).await;

        assert!(chat.sent()[0].1.contains("usage"));
    }

    #[tokio::test]
    async fn non_admin_is_rejected_without_mutation() {
        let (moderator, chat, store) = setup_non_admin().await;

        moderator
            .handle(block_command(&["global", "spam"], None))
            .await;

        assert!(store.load().global.is_empty());
        assert!(chat.sent()[0].1.contains("administrators"));
    }

    #[tokio::test]
    async fn reply_default_mode_blocks_identity_only() {
        let (moderator, _chat, store) = setup().await;

        let target = MediaItem::new(MediaKind::Video)
            .with_content_id("uid-1")
            .with_file_name("cat_meme.mp4");
        moderator.handle(block_command(&[], Some(target))).await;

        let rules = store.load();
        assert_eq!(rules.blocked_ids, vec!["uid-1"]);
        assert!(rules.video_photo.is_empty());
    }

    #[tokio::test]
    async fn reply_yes_mode_blocks_identity_and_filename() {
        let (moderator, _chat, store) = setup().await;

        let target = MediaItem::new(MediaKind::Video)
            .with_content_id("uid-1")
            .with_file_name("cat_meme.mp4");
        moderator.handle(block_reply("yes", target)).await;

        let rules = store.load();
        assert_eq!(rules.blocked_ids, vec!["uid-1"]);
        assert_eq!(rules.video_photo, vec!["cat meme"]);
    }

    #[tokio::test]
    async fn reply_no_mode_blocks_filename_only() {
        let (moderator, _chat, store) = setup().await;

        let target = MediaItem::new(MediaKind::Animation)
            .with_content_id("uid-1")
            .with_file_name("wobble-cat.gif");
        moderator.handle(block_reply("no", target)).await;

        let rules = store.load();
        assert!(rules.blocked_ids.is_empty());
        assert_eq!(rules.animation, vec!["wobble cat"]);
    }

    #[tokio::test]
    async fn reply_yesedit_registers_pending_edit_for_target_category() {
        let (moderator, chat, store) = setup().await;

        let target = MediaItem::new(MediaKind::Video)
            .with_content_id("uid-1")
            .with_file_name("cat_meme.mp4");
        moderator.handle(block_reply("yesedit", target)).await;

        let rules = store.load();
        assert_eq!(rules.blocked_ids, vec!["uid-1"]);
        // yesedit defers the keyword; the filename is not blocked.
        assert!(rules.video_photo.is_empty());
        assert!(chat.sent()[0].1.contains("video_photo"));

        // The follow-up message supplies the keyword.
        moderator.handle(text_message(2, "FunnyCats")).await;
        assert_eq!(store.load().video_photo, vec!["funnycats"]);

        // Consumption is exactly-once: further text is ordinary content.
        moderator.handle(text_message(3, "funnier cats")).await;
        assert_eq!(store.load().video_photo, vec!["funnycats"]);
    }

    #[tokio::test]
    async fn reply_noedit_skips_identity_and_registers_edit() {
        let (moderator, _chat, store) = setup().await;

        let target = MediaItem::new(MediaKind::Document)
            .with_content_id("uid-1")
            .with_file_name("report.pdf");
        moderator.handle(block_reply("noedit", target)).await;

        assert!(store.load().blocked_ids.is_empty());

        moderator.handle(text_message(2, "quarterly spam")).await;
        assert_eq!(store.load().global, vec!["quarterly spam"]);
    }

    #[tokio::test]
    async fn expired_pending_edit_is_ordinary_content() {
        let (moderator, chat, store) = setup().await;
        // The test moderator uses a tiny pending TTL.
        let target = MediaItem::new(MediaKind::Video)
            .with_content_id("uid-1")
            .with_file_name("cat_meme.mp4");
        moderator.handle(block_reply("yesedit", target)).await;

        tokio::time::sleep(std::time::Duration::from_millis(600)).await;

        store.add_pattern(RuleCategory::Global, "latecomer").unwrap();
        moderator.cache().refresh();
        moderator.handle(text_message(9, "a latecomer message")).await;

        // Not consumed as a keyword: video_photo unchanged, and the text
        // was content-matched (and deleted) instead.
        assert!(store.load().video_photo.is_empty());
        assert!(chat
            .deleted()
            .iter()
            .any(|m| m.message_id == 9));
    }

    #[tokio::test]
    async fn reply_to_sticker_with_pack_blocks_pack_name() {
        let (moderator, chat, store) = setup().await;

        let target = MediaItem::new(MediaKind::Sticker)
            .with_content_id("uid-s")
            .with_sticker_pack("SpamPack");
        moderator.handle(block_command(&[], Some(target.clone()))).await;
        assert_eq!(store.load().sticker, vec!["SpamPack"]);

        // Idempotent: a second block is an informational no-op.
        moderator.handle(block_command(&[], Some(target))).await;
        assert_eq!(store.load().sticker, vec!["SpamPack"]);
        assert!(chat.sent()[1].1.contains("already blocked"));
    }

    #[tokio::test]
    async fn reply_to_packless_sticker_blocks_identity() {
        let (moderator, _chat, store) = setup().await;

        let target = MediaItem::new(MediaKind::Sticker).with_content_id("uid-s");
        moderator.handle(block_command(&[], Some(target))).await;

        assert_eq!(store.load().blocked_ids, vec!["uid-s"]);
        assert!(store.load().sticker.is_empty());
    }

    #[tokio::test]
    async fn reply_without_identifiable_content_is_rejected() {
        let (moderator, chat, store) = setup().await;

        let target = MediaItem::new(MediaKind::Photo);
        moderator.handle(block_command(&[], Some(target))).await;

        assert_eq!(store.load(), Default::default());
        assert!(chat.sent()[0].1.contains("no content id or filename"));
    }

    #[tokio::test]
    async fn unrecognized_mode_is_rejected_without_mutation() {
        let (moderator, chat, store) = setup().await;

        let target = MediaItem::new(MediaKind::Video).with_content_id("uid-1");
        moderator.handle(block_reply("maybe", target)).await;

        assert_eq!(store.load(), Default::default());
        assert!(chat.sent()[0].1.contains("invalid mode"));
    }

    #[tokio::test]
    async fn command_mutations_are_visible_to_next_decision() {
        let (moderator, chat, _store) = setup().await;

        let target = MediaItem::new(MediaKind::Video)
            .with_content_id("uid-1")
            .with_file_name("cat_meme.mp4");
        moderator.handle(block_command(&[], Some(target))).await;

        // Self-read consistency: the very next event sees the new rule.
        let repost = MediaItem::new(MediaKind::Video).with_content_id("uid-1");
        moderator.handle(media_message(repost)).await;
        assert!(chat
            .deleted()
            .iter()
            .any(|m| m.message_id == MEDIA_MESSAGE_ID));
    }
}
