//! Room events delivered through mailboxes.

use serde_json::{Map, Value};

use super::value_object::{Timestamp, UserId};

/// Opaque signaling payload (offer / answer / ICE candidate, ...).
///
/// The relay never inspects its shape.
pub type Payload = Map<String, Value>;

/// What happened in the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    UserJoined,
    UserLeft,
    Message,
}

/// An immutable record copied by value into each target mailbox.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub timestamp: Timestamp,
    pub action: Action,
    /// The user the event is about (joiner, leaver, or message author).
    pub origin: UserId,
    pub payload: Option<Payload>,
}

impl Event {
    pub fn user_joined(user_id: UserId) -> Self {
        Self::new(Action::UserJoined, user_id, None)
    }

    pub fn user_left(user_id: UserId) -> Self {
        Self::new(Action::UserLeft, user_id, None)
    }

    pub fn message(from: UserId, payload: Payload) -> Self {
        Self::new(Action::Message, from, Some(payload))
    }

    fn new(action: Action, origin: UserId, payload: Option<Payload>) -> Self {
        Self {
            timestamp: Timestamp::now(),
            action,
            origin,
            payload,
        }
    }
}
