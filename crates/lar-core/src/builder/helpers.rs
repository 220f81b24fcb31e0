use std::sync::Arc;

use crate::{
    builder::RuleBuilder,
    command::{
        CompositeReplyCommand, ImageReplyCommand, SharedCommand, StickerReplyCommand,
        TextReplyCommand,
    },
    message::MessageType,
    specification::{
        regex::DEFAULT_REGEX_FLAGS, time_window::DEFAULT_TIME_ZONE, KeywordMatchMode,
        KeywordSpecification, MessageTypeSpecification, RegexSpecification, SharedSpecification,
        TimeWindowSpecification,
    },
    Result,
};

const CERTAIN: f64 = 1.0;

/// Shorthand constructors for the specification types.
pub struct SpecificationBuilder;

impl SpecificationBuilder {
    /// Case-insensitive partial match.
    pub fn keyword(keyword: &str) -> Result<SharedSpecification> {
        Self::keyword_with(keyword, KeywordMatchMode::Partial, false)
    }

    pub fn keyword_with(
        keyword: &str,
        mode: KeywordMatchMode,
        case_sensitive: bool,
    ) -> Result<SharedSpecification> {
        Ok(Arc::new(KeywordSpecification::new(keyword, mode, case_sensitive)?))
    }

    pub fn regex(pattern: &str) -> Result<SharedSpecification> {
        Self::regex_with_flags(pattern, DEFAULT_REGEX_FLAGS)
    }

    pub fn regex_with_flags(pattern: &str, flags: &str) -> Result<SharedSpecification> {
        Ok(Arc::new(RegexSpecification::new(pattern, flags)?))
    }

    pub fn time_window(start: &str, end: &str) -> Result<SharedSpecification> {
        Self::time_window_in(start, end, DEFAULT_TIME_ZONE)
    }

    pub fn time_window_in(start: &str, end: &str, time_zone: &str) -> Result<SharedSpecification> {
        Ok(Arc::new(TimeWindowSpecification::new(start, end, time_zone)?))
    }

    pub fn message_type(
        types: impl IntoIterator<Item = MessageType>,
    ) -> Result<SharedSpecification> {
        Ok(Arc::new(MessageTypeSpecification::new(types)?))
    }

    pub fn text_only() -> SharedSpecification {
        Self::only(MessageType::Text)
    }

    pub fn image_only() -> SharedSpecification {
        Self::only(MessageType::Image)
    }

    pub fn sticker_only() -> SharedSpecification {
        Self::only(MessageType::Sticker)
    }

    fn only(kind: MessageType) -> SharedSpecification {
        Arc::new(MessageTypeSpecification::single(kind))
    }
}

/// Shorthand constructors for the reply commands.
pub struct CommandBuilder;

impl CommandBuilder {
    pub fn text(text: &str) -> Result<SharedCommand> {
        Self::text_with_probability(text, CERTAIN)
    }

    pub fn text_with_probability(text: &str, probability: f64) -> Result<SharedCommand> {
        Ok(Arc::new(TextReplyCommand::new(text, probability)?))
    }

    pub fn sticker(package_id: &str, sticker_id: &str) -> Result<SharedCommand> {
        Self::sticker_with_probability(package_id, sticker_id, CERTAIN)
    }

    pub fn sticker_with_probability(
        package_id: &str,
        sticker_id: &str,
        probability: f64,
    ) -> Result<SharedCommand> {
        Ok(Arc::new(StickerReplyCommand::new(
            package_id,
            sticker_id,
            probability,
        )?))
    }

    pub fn image(original_content_url: &str, preview_image_url: &str) -> Result<SharedCommand> {
        Self::image_with_probability(original_content_url, preview_image_url, CERTAIN)
    }

    pub fn image_with_probability(
        original_content_url: &str,
        preview_image_url: &str,
        probability: f64,
    ) -> Result<SharedCommand> {
        Ok(Arc::new(ImageReplyCommand::new(
            original_content_url,
            preview_image_url,
            probability,
        )?))
    }

    /// Runs every command in order.
    pub fn all(commands: Vec<SharedCommand>) -> Result<SharedCommand> {
        Ok(Arc::new(CompositeReplyCommand::new(commands, true)?))
    }

    /// Runs one command picked uniformly at random.
    pub fn one_of(commands: Vec<SharedCommand>) -> Result<SharedCommand> {
        Ok(Arc::new(CompositeReplyCommand::new(commands, false)?))
    }
}

pub const DEFAULT_GREETING_KEYWORD: &str = "こんにちは";
pub const DEFAULT_BUSINESS_HOURS: (&str, &str) = ("09:00", "18:00");
pub const DEFAULT_BUSINESS_HOURS_MESSAGE: &str = "営業時間内です";
pub const DEFAULT_STICKER: (&str, &str) = ("446", "1988");

/// Ready-made rules. Each returns a builder with account, name, trigger and
/// response filled in; callers may still add a rate limit or override fields.
pub struct PresetBuilder;

impl PresetBuilder {
    /// Replies `greeting` whenever a text contains "こんにちは".
    pub fn greeting(account_id: &str, greeting: &str) -> Result<RuleBuilder> {
        Ok(RuleBuilder::create()
            .for_account(account_id)
            .named("挨拶ルール")
            .when(SpecificationBuilder::keyword(DEFAULT_GREETING_KEYWORD)?)
            .then(CommandBuilder::text(greeting)?))
    }

    pub fn business_hours(
        account_id: &str,
        start: &str,
        end: &str,
        time_zone: &str,
        message: &str,
    ) -> Result<RuleBuilder> {
        Ok(RuleBuilder::create()
            .for_account(account_id)
            .named("営業時間ルール")
            .when(SpecificationBuilder::time_window_in(start, end, time_zone)?)
            .then(CommandBuilder::text(message)?))
    }

    pub fn sticker_reaction(
        account_id: &str,
        package_id: &str,
        sticker_id: &str,
    ) -> Result<RuleBuilder> {
        Ok(RuleBuilder::create()
            .for_account(account_id)
            .named("スタンプ反応ルール")
            .when(SpecificationBuilder::sticker_only())
            .then(CommandBuilder::sticker(package_id, sticker_id)?))
    }
}
