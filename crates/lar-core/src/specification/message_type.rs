use std::collections::BTreeSet;

use crate::{
    errors::Error,
    message::{IncomingMessage, MessageType},
    specification::MessageSpecification,
    Result,
};

/// Holds when the message's type is one of the allowed types.
#[derive(Clone, Debug)]
pub struct MessageTypeSpecification {
    allowed: BTreeSet<MessageType>,
}

impl MessageTypeSpecification {
    pub fn new(allowed: impl IntoIterator<Item = MessageType>) -> Result<Self> {
        let allowed: BTreeSet<MessageType> = allowed.into_iter().collect();
        if allowed.is_empty() {
            return Err(Error::Validation(
                "at least one message type must be specified".to_string(),
            ));
        }
        Ok(Self { allowed })
    }

    pub fn single(kind: MessageType) -> Self {
        Self {
            allowed: BTreeSet::from([kind]),
        }
    }

    pub fn allowed_types(&self) -> impl Iterator<Item = MessageType> + '_ {
        self.allowed.iter().copied()
    }
}

impl MessageSpecification for MessageTypeSpecification {
    fn is_satisfied_by(&self, message: &IncomingMessage) -> bool {
        self.allowed.contains(&message.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::message_of;

    #[test]
    fn empty_set_is_rejected() {
        assert!(MessageTypeSpecification::new(Vec::new()).unwrap_err().is_validation());
    }

    #[test]
    fn membership() {
        let s = MessageTypeSpecification::new([MessageType::Sticker, MessageType::Image]).unwrap();
        assert!(s.is_satisfied_by(&message_of(MessageType::Sticker, None)));
        assert!(s.is_satisfied_by(&message_of(MessageType::Image, None)));
        assert!(!s.is_satisfied_by(&message_of(MessageType::Text, Some("hi"))));
        assert_eq!(s.allowed_types().count(), 2);
    }
}
