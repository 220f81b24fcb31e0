use crate::{
    message::IncomingMessage,
    specification::{MessageSpecification, SharedSpecification},
};

/// Both sides must hold. The right side is only evaluated when the left holds.
#[derive(Clone, Debug)]
pub struct AndSpecification {
    left: SharedSpecification,
    right: SharedSpecification,
}

impl AndSpecification {
    pub fn new(left: SharedSpecification, right: SharedSpecification) -> Self {
        Self { left, right }
    }
}

impl MessageSpecification for AndSpecification {
    fn is_satisfied_by(&self, message: &IncomingMessage) -> bool {
        self.left.is_satisfied_by(message) && self.right.is_satisfied_by(message)
    }
}

/// Either side must hold. The right side is only evaluated when the left fails.
#[derive(Clone, Debug)]
pub struct OrSpecification {
    left: SharedSpecification,
    right: SharedSpecification,
}

impl OrSpecification {
    pub fn new(left: SharedSpecification, right: SharedSpecification) -> Self {
        Self { left, right }
    }
}

impl MessageSpecification for OrSpecification {
    fn is_satisfied_by(&self, message: &IncomingMessage) -> bool {
        self.left.is_satisfied_by(message) || self.right.is_satisfied_by(message)
    }
}

#[derive(Clone, Debug)]
pub struct NotSpecification {
    inner: SharedSpecification,
}

impl NotSpecification {
    pub fn new(inner: SharedSpecification) -> Self {
        Self { inner }
    }
}

impl MessageSpecification for NotSpecification {
    fn is_satisfied_by(&self, message: &IncomingMessage) -> bool {
        !self.inner.is_satisfied_by(message)
    }
}
