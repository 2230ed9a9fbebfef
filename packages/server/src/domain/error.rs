//! Domain error types.

use thiserror::Error;

use super::value_object::{RoomName, UserId};

/// Value Object の生成に失敗した場合のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{kind} must be at most {max} characters")]
    TooLong { kind: &'static str, max: usize },

    #[error("{0} must not contain \"__\" nor start or end with \"_\"")]
    ReservedSeparator(&'static str),
}

/// Room-level errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("user '{0}' is already in room")]
    AlreadyMember(UserId),

    #[error("user '{0}' is not in room")]
    NotMember(UserId),

    /// The rate limiter wait was canceled or its deadline elapsed.
    #[error("send limiter wait canceled")]
    Canceled,

    /// Another consumer is already streaming this mailbox.
    #[error("events of user '{0}' are already being streamed")]
    StreamBusy(UserId),

    /// The room was disposed and accepts no new members.
    #[error("room '{0}' is closed")]
    Closed(RoomName),
}

/// Registry-level errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("room '{0}' already exists")]
    AlreadyExists(RoomName),

    #[error("room '{0}' does not exist")]
    NotFound(RoomName),
}
