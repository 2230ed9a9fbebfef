//! Domain layer: rooms, mailboxes, events and the registry contract.

pub mod error;
pub mod event;
mod mailbox;
pub mod rate_limiter;
pub mod repository;
pub mod room;
pub mod value_object;

pub use error::{RepositoryError, RoomError, ValueObjectError};
pub use event::{Action, Event, Payload};
pub use mailbox::EventStream;
pub use rate_limiter::{RateLimiter, SendContext};
pub use repository::{RoomRepository, RoomSnapshot, SweepReport};
pub use room::{Delivery, Eviction, EvictionReason, MemberSnapshot, Room, RoomConfig};
pub use value_object::{RoomName, Timestamp, UserId};

#[cfg(test)]
pub use repository::MockRoomRepository;
