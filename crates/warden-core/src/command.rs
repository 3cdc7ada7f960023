//! `/block` command grammar.
//!
//! The command has two forms. Issued as a reply, the first argument is an
//! optional mode token controlling what gets blocked on the target message.
//! Issued without a reply, the arguments are a keyword category followed by
//! the keyword itself.

use crate::error::RuleError;
use crate::normalize::normalize_keyword;
use crate::rules::RuleCategory;

/// Name of the block command, without the leading slash.
pub const BLOCK_COMMAND: &str = "block";

/// Mode token of a reply-form `/block` invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockMode {
    /// Block the content identity only (default when no token is given).
    #[default]
    IdOnly,
    /// Block the identity and the cleaned filename.
    Yes,
    /// Block the cleaned filename only.
    No,
    /// Block the identity and ask for a follow-up keyword.
    YesEdit,
    /// Ask for a follow-up keyword only.
    NoEdit,
}

impl BlockMode {
    /// Parses a mode token, case-insensitively.
    ///
    /// Unrecognized tokens are a validation error rather than an implicit
    /// "block nothing".
    pub fn parse(token: &str) -> Result<BlockMode, RuleError> {
        match token.to_lowercase().as_str() {
            "id_only" => Ok(BlockMode::IdOnly),
            "yes" => Ok(BlockMode::Yes),
            "no" => Ok(BlockMode::No),
            "yesedit" => Ok(BlockMode::YesEdit),
            "noedit" => Ok(BlockMode::NoEdit),
            _ => Err(RuleError::InvalidMode(token.to_string())),
        }
    }

    /// Returns true if this mode blocks the content identity.
    pub fn blocks_identity(&self) -> bool {
        matches!(self, BlockMode::IdOnly | BlockMode::Yes | BlockMode::YesEdit)
    }

    /// Returns true if this mode blocks the cleaned filename immediately.
    pub fn blocks_filename(&self) -> bool {
        matches!(self, BlockMode::Yes | BlockMode::No)
    }

    /// Returns true if this mode registers a pending keyword edit.
    pub fn requests_edit(&self) -> bool {
        matches!(self, BlockMode::YesEdit | BlockMode::NoEdit)
    }
}

/// A validated text-form keyword addition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordAddition {
    /// The target keyword category.
    pub category: RuleCategory,
    /// The normalized keyword.
    pub keyword: String,
}

/// Parses the arguments of a reply-form invocation into a mode.
pub fn parse_reply_mode(args: &[String]) -> Result<BlockMode, RuleError> {
    match args.first() {
        Some(token) => BlockMode::parse(token),
        None => Ok(BlockMode::default()),
    }
}

/// Parses the arguments of a text-form invocation: a category token followed
/// by one or more keyword tokens, joined with single spaces and lower-cased.
pub fn parse_text_mode(args: &[String]) -> Result<KeywordAddition, RuleError> {
    if args.len() < 2 {
        return Err(RuleError::Usage);
    }

    let category = RuleCategory::parse_keyword(&args[0])?;
    let keyword = normalize_keyword(&args[1..].join(" "));
    if keyword.is_empty() {
        return Err(RuleError::EmptyValue);
    }

    Ok(KeywordAddition { category, keyword })
}
