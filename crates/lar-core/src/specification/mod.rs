//! Predicates deciding *when* a rule fires.

use std::{fmt, sync::Arc};

use crate::message::IncomingMessage;

pub mod composite;
pub mod keyword;
pub mod message_type;
pub mod regex;
pub mod time_window;

pub use composite::{AndSpecification, NotSpecification, OrSpecification};
pub use keyword::{KeywordMatchMode, KeywordSpecification};
pub use message_type::MessageTypeSpecification;
pub use regex::RegexSpecification;
pub use time_window::TimeWindowSpecification;

/// A pure boolean predicate over an inbound message.
pub trait MessageSpecification: fmt::Debug + Send + Sync {
    fn is_satisfied_by(&self, message: &IncomingMessage) -> bool;
}

pub type SharedSpecification = Arc<dyn MessageSpecification>;

impl<T: MessageSpecification + ?Sized> MessageSpecification for Arc<T> {
    fn is_satisfied_by(&self, message: &IncomingMessage) -> bool {
        (**self).is_satisfied_by(message)
    }
}

impl<T: MessageSpecification + ?Sized> MessageSpecification for Box<T> {
    fn is_satisfied_by(&self, message: &IncomingMessage) -> bool {
        (**self).is_satisfied_by(message)
    }
}

/// Fluent combinators available on every specification.
pub trait SpecificationExt: MessageSpecification + Sized + 'static {
    fn and<S: MessageSpecification + 'static>(self, other: S) -> AndSpecification {
        AndSpecification::new(Arc::new(self), Arc::new(other))
    }

    fn or<S: MessageSpecification + 'static>(self, other: S) -> OrSpecification {
        OrSpecification::new(Arc::new(self), Arc::new(other))
    }

    fn not(self) -> NotSpecification {
        NotSpecification::new(Arc::new(self))
    }

    fn shared(self) -> SharedSpecification {
        Arc::new(self)
    }
}

impl<T: MessageSpecification + Sized + 'static> SpecificationExt for T {}
