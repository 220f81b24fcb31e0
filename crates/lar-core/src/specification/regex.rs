use regex::{Regex, RegexBuilder};

use crate::{
    errors::Error,
    message::{IncomingMessage, MessageType},
    specification::MessageSpecification,
    Result,
};

pub const DEFAULT_REGEX_FLAGS: &str = "i";

/// Matches text messages against a regular expression compiled once up front.
#[derive(Clone, Debug)]
pub struct RegexSpecification {
    pattern: Regex,
    flags: String,
}

impl RegexSpecification {
    /// Flags: `i` (case-insensitive), `m` (multi-line), `s` (dot matches
    /// newline), `x` (ignore whitespace). `g` and `u` are accepted and ignored.
    pub fn new(pattern: &str, flags: &str) -> Result<Self> {
        if pattern.trim().is_empty() {
            return Err(Error::Validation("regex pattern cannot be empty".to_string()));
        }

        let mut builder = RegexBuilder::new(pattern);
        for flag in flags.chars() {
            match flag {
                'i' => {
                    builder.case_insensitive(true);
                }
                'm' => {
                    builder.multi_line(true);
                }
                's' => {
                    builder.dot_matches_new_line(true);
                }
                'x' => {
                    builder.ignore_whitespace(true);
                }
                'g' | 'u' => {}
                other => {
                    return Err(Error::Validation(format!(
                        "unsupported regex flag '{other}' in {flags:?}"
                    )))
                }
            }
        }

        let pattern = builder
            .build()
            .map_err(|e| Error::Validation(format!("invalid regex pattern {pattern:?}: {e}")))?;

        Ok(Self {
            pattern,
            flags: flags.to_string(),
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }
}

impl MessageSpecification for RegexSpecification {
    fn is_satisfied_by(&self, message: &IncomingMessage) -> bool {
        if message.kind() != MessageType::Text {
            return false;
        }
        message
            .text()
            .filter(|t| !t.is_empty())
            .is_some_and(|t| self.pattern.is_match(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{message_of, text_message};

    #[test]
    fn invalid_pattern_fails_at_construction() {
        let err = RegexSpecification::new("(unclosed", "i").unwrap_err();
        assert!(err.is_validation());
        assert!(RegexSpecification::new("", "i").unwrap_err().is_validation());
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(RegexSpecification::new("a", "iy").unwrap_err().is_validation());
        assert!(RegexSpecification::new("a", "gu").is_ok());
    }

    #[test]
    fn default_flags_ignore_case() {
        let s = RegexSpecification::new(r"^order\s*#\d+$", DEFAULT_REGEX_FLAGS).unwrap();
        assert!(s.is_satisfied_by(&text_message("ORDER #123")));
        assert!(!s.is_satisfied_by(&text_message("my order #123")));
    }

    #[test]
    fn case_sensitive_without_flags() {
        let s = RegexSpecification::new("Hello", "").unwrap();
        assert!(s.is_satisfied_by(&text_message("Hello")));
        assert!(!s.is_satisfied_by(&text_message("hello")));
    }

    #[test]
    fn multi_line_flag() {
        let s = RegexSpecification::new("^second$", "m").unwrap();
        assert!(s.is_satisfied_by(&text_message("first\nsecond")));
    }

    #[test]
    fn non_text_messages_never_match() {
        let s = RegexSpecification::new(".*", "").unwrap();
        assert!(!s.is_satisfied_by(&message_of(MessageType::Image, None)));
        assert!(!s.is_satisfied_by(&message_of(MessageType::Text, None)));
        assert!(!s.is_satisfied_by(&message_of(MessageType::Text, Some(""))));
        assert!(s.is_satisfied_by(&message_of(MessageType::Text, Some("x"))));
    }
}
