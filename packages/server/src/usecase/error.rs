//! UseCase ごとのエラー型

use thiserror::Error;

use crate::domain::{RepositoryError, RoomError, RoomName, UserId};

/// 参加処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinChannelError {
    #[error("user '{0}' is already in room")]
    AlreadyMember(UserId),

    /// The room kept closing underneath the join.
    #[error("room '{0}' is unavailable, retry later")]
    RoomUnavailable(RoomName),

    #[error(transparent)]
    Room(RoomError),
}

impl From<RoomError> for JoinChannelError {
    fn from(e: RoomError) -> Self {
        match e {
            RoomError::AlreadyMember(user) => Self::AlreadyMember(user),
            RoomError::Closed(room) => Self::RoomUnavailable(room),
            other => Self::Room(other),
        }
    }
}

/// 退出処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeaveChannelError {
    #[error("room '{0}' does not exist")]
    RoomNotFound(RoomName),

    #[error("user '{0}' is not in room")]
    NotMember(UserId),

    #[error(transparent)]
    Repository(RepositoryError),

    #[error(transparent)]
    Room(RoomError),
}

impl From<RepositoryError> for LeaveChannelError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound(room) => Self::RoomNotFound(room),
            other => Self::Repository(other),
        }
    }
}

impl From<RoomError> for LeaveChannelError {
    fn from(e: RoomError) -> Self {
        match e {
            RoomError::NotMember(user) => Self::NotMember(user),
            other => Self::Room(other),
        }
    }
}

/// ピアへの送信処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendToPeerError {
    #[error("room '{0}' does not exist")]
    RoomNotFound(RoomName),

    #[error("user '{0}' is not in room")]
    NotMember(UserId),

    #[error("send canceled while waiting for the rate limiter")]
    Canceled,

    #[error(transparent)]
    Repository(RepositoryError),

    #[error(transparent)]
    Room(RoomError),
}

impl From<RepositoryError> for SendToPeerError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound(room) => Self::RoomNotFound(room),
            other => Self::Repository(other),
        }
    }
}

impl From<RoomError> for SendToPeerError {
    fn from(e: RoomError) -> Self {
        match e {
            RoomError::NotMember(user) => Self::NotMember(user),
            RoomError::Canceled => Self::Canceled,
            other => Self::Room(other),
        }
    }
}

/// イベント取得（バッチ・ストリーム）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchEventsError {
    #[error("room '{0}' does not exist")]
    RoomNotFound(RoomName),

    #[error("user '{0}' is not in room")]
    NotMember(UserId),

    #[error("events of user '{0}' are already being streamed")]
    StreamBusy(UserId),

    #[error(transparent)]
    Repository(RepositoryError),

    #[error(transparent)]
    Room(RoomError),
}

impl From<RepositoryError> for FetchEventsError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound(room) => Self::RoomNotFound(room),
            other => Self::Repository(other),
        }
    }
}

impl From<RoomError> for FetchEventsError {
    fn from(e: RoomError) -> Self {
        match e {
            RoomError::NotMember(user) => Self::NotMember(user),
            RoomError::StreamBusy(user) => Self::StreamBusy(user),
            other => Self::Room(other),
        }
    }
}
