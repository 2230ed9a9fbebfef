//! HTTP error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    domain::{RepositoryError, RoomError, ValueObjectError},
    infrastructure::dto::subscription::SubscriptionIdError,
    usecase::{FetchEventsError, JoinChannelError, LeaveChannelError, SendToPeerError},
};

/// Error returned by every handler, rendered as `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("missing or unknown session token")]
    Unauthorized,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    TooManyRequests(String),

    #[error("{0}")]
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!("Request rejected ({}): {}", status, self);
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<ValueObjectError> for ApiError {
    fn from(e: ValueObjectError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl From<SubscriptionIdError> for ApiError {
    fn from(e: SubscriptionIdError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl From<RoomError> for ApiError {
    fn from(e: RoomError) -> Self {
        let message = e.to_string();
        match e {
            RoomError::AlreadyMember(_) | RoomError::StreamBusy(_) => Self::Conflict(message),
            RoomError::NotMember(_) => Self::NotFound(message),
            RoomError::Canceled => Self::TooManyRequests(message),
            RoomError::Closed(_) => Self::ServiceUnavailable(message),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        let message = e.to_string();
        match e {
            RepositoryError::AlreadyExists(_) => Self::Conflict(message),
            RepositoryError::NotFound(_) => Self::NotFound(message),
        }
    }
}

impl From<JoinChannelError> for ApiError {
    fn from(e: JoinChannelError) -> Self {
        let message = e.to_string();
        match e {
            JoinChannelError::AlreadyMember(_) => Self::Conflict(message),
            JoinChannelError::RoomUnavailable(_) => Self::ServiceUnavailable(message),
            JoinChannelError::Room(e) => e.into(),
        }
    }
}

impl From<LeaveChannelError> for ApiError {
    fn from(e: LeaveChannelError) -> Self {
        let message = e.to_string();
        match e {
            LeaveChannelError::RoomNotFound(_) | LeaveChannelError::NotMember(_) => {
                Self::NotFound(message)
            }
            LeaveChannelError::Repository(e) => e.into(),
            LeaveChannelError::Room(e) => e.into(),
        }
    }
}

impl From<SendToPeerError> for ApiError {
    fn from(e: SendToPeerError) -> Self {
        let message = e.to_string();
        match e {
            SendToPeerError::RoomNotFound(_) | SendToPeerError::NotMember(_) => {
                Self::NotFound(message)
            }
            SendToPeerError::Canceled => Self::TooManyRequests(message),
            SendToPeerError::Repository(e) => e.into(),
            SendToPeerError::Room(e) => e.into(),
        }
    }
}

impl From<FetchEventsError> for ApiError {
    fn from(e: FetchEventsError) -> Self {
        let message = e.to_string();
        match e {
            FetchEventsError::RoomNotFound(_) | FetchEventsError::NotMember(_) => {
                Self::NotFound(message)
            }
            FetchEventsError::StreamBusy(_) => Self::Conflict(message),
            FetchEventsError::Repository(e) => e.into(),
            FetchEventsError::Room(e) => e.into(),
        }
    }
}
