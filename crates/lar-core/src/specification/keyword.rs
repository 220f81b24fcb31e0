use std::str::FromStr;

use crate::{
    errors::Error,
    message::{IncomingMessage, MessageType},
    specification::MessageSpecification,
    Result,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum KeywordMatchMode {
    Exact,
    #[default]
    Partial,
    StartsWith,
    EndsWith,
}

impl KeywordMatchMode {
    fn apply(self, text: &str, keyword: &str) -> bool {
        match self {
            KeywordMatchMode::Exact => text == keyword,
            KeywordMatchMode::Partial => text.contains(keyword),
            KeywordMatchMode::StartsWith => text.starts_with(keyword),
            KeywordMatchMode::EndsWith => text.ends_with(keyword),
        }
    }
}

impl FromStr for KeywordMatchMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "exact" => Ok(KeywordMatchMode::Exact),
            "partial" => Ok(KeywordMatchMode::Partial),
            "starts_with" | "startswith" => Ok(KeywordMatchMode::StartsWith),
            "ends_with" | "endswith" => Ok(KeywordMatchMode::EndsWith),
            other => Err(Error::Validation(format!(
                "unknown keyword match mode: {other}"
            ))),
        }
    }
}

/// Matches text messages against a keyword.
#[derive(Clone, Debug)]
pub struct KeywordSpecification {
    keyword: String,
    mode: KeywordMatchMode,
    case_sensitive: bool,
}

impl KeywordSpecification {
    pub fn new(keyword: impl Into<String>, mode: KeywordMatchMode, case_sensitive: bool) -> Result<Self> {
        let keyword = keyword.into();
        if keyword.trim().is_empty() {
            return Err(Error::Validation("keyword cannot be empty".to_string()));
        }
        Ok(Self {
            keyword,
            mode,
            case_sensitive,
        })
    }

    /// Partial, case-insensitive match.
    pub fn partial(keyword: impl Into<String>) -> Result<Self> {
        Self::new(keyword, KeywordMatchMode::Partial, false)
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn mode(&self) -> KeywordMatchMode {
        self.mode
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    fn matches(&self, text: &str) -> bool {
        if self.case_sensitive {
            self.mode.apply(text, &self.keyword)
        } else {
            self.mode
                .apply(&text.to_lowercase(), &self.keyword.to_lowercase())
        }
    }
}

impl MessageSpecification for KeywordSpecification {
    fn is_satisfied_by(&self, message: &IncomingMessage) -> bool {
        if message.kind() != MessageType::Text {
            return false;
        }
        match message.text() {
            Some(text) if !text.is_empty() => self.matches(text),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{message_of, text_message};

    fn spec(keyword: &str, mode: KeywordMatchMode) -> KeywordSpecification {
        KeywordSpecification::new(keyword, mode, false).unwrap()
    }

    #[test]
    fn empty_keyword_is_rejected() {
        assert!(KeywordSpecification::new("  ", KeywordMatchMode::Exact, false)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn partial_matches_japanese_substring() {
        let s = spec("こんにちは", KeywordMatchMode::Partial);
        assert!(s.is_satisfied_by(&text_message("こんにちはmsg")));
        assert!(s.is_satisfied_by(&text_message("みなさんこんにちは！")));
        assert!(!s.is_satisfied_by(&text_message("こんばんは")));
    }

    #[test]
    fn modes() {
        let msg = text_message("Good Morning");
        assert!(spec("good morning", KeywordMatchMode::Exact).is_satisfied_by(&msg));
        assert!(!spec("good", KeywordMatchMode::Exact).is_satisfied_by(&msg));
        assert!(spec("good", KeywordMatchMode::StartsWith).is_satisfied_by(&msg));
        assert!(!spec("morning", KeywordMatchMode::StartsWith).is_satisfied_by(&msg));
        assert!(spec("MORNING", KeywordMatchMode::EndsWith).is_satisfied_by(&msg));
        assert!(!spec("good", KeywordMatchMode::EndsWith).is_satisfied_by(&msg));
    }

    #[test]
    fn case_sensitive_compares_verbatim() {
        let s = KeywordSpecification::new("Hello", KeywordMatchMode::Partial, true).unwrap();
        assert!(s.is_satisfied_by(&text_message("Hello world")));
        assert!(!s.is_satisfied_by(&text_message("hello world")));
    }

    #[test]
    fn only_text_messages_with_text_match() {
        let s = spec("hi", KeywordMatchMode::Partial);
        assert!(!s.is_satisfied_by(&message_of(MessageType::Sticker, Some("hi"))));
        assert!(!s.is_satisfied_by(&message_of(MessageType::Text, None)));
        assert!(!s.is_satisfied_by(&message_of(MessageType::Text, Some(""))));
    }

    #[test]
    fn parses_modes() {
        assert_eq!("StartsWith".parse::<KeywordMatchMode>().unwrap(), KeywordMatchMode::StartsWith);
        assert_eq!("ends_with".parse::<KeywordMatchMode>().unwrap(), KeywordMatchMode::EndsWith);
        assert!("fuzzy".parse::<KeywordMatchMode>().is_err());
    }
}
