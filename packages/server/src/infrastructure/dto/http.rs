//! HTTP DTOs.
//!
//! Field names follow the JSON contract used by existing browser clients
//! (`userID`, `channelName`, `subscriptionID`, ...).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "userID")]
    pub user_id: String,
    /// Accepted for compatibility; credentials are not checked.
    #[serde(rename = "passHash", default)]
    pub pass_hash: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelRequest {
    #[serde(rename = "channelName")]
    pub channel_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinChannelResponse {
    #[serde(rename = "subscriptionID")]
    pub subscription_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "OK".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionQuery {
    #[serde(rename = "subscriptionID")]
    pub subscription_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendToPeerRequest {
    #[serde(rename = "channelName")]
    pub channel_name: String,
    #[serde(rename = "destinationUserID")]
    pub destination_user_id: String,
    pub message: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionRequest {
    #[serde(rename = "roomName")]
    pub room_name: String,
    pub height: u32,
}

/// Event kind as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    #[serde(rename = "user joined")]
    UserJoined,
    #[serde(rename = "user left")]
    UserLeft,
    #[serde(rename = "message")]
    Message,
}

/// One event, used both in SSE frames and in `{"entities": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDto {
    /// RFC 3339
    pub time: String,
    #[serde(rename = "actionType")]
    pub action_type: ActionType,
    #[serde(rename = "userID")]
    pub user_id: String,
    pub data: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitiesResponse {
    pub entities: Vec<EventDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberStateDto {
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(rename = "secondsSinceLastInteraction")]
    pub seconds_since_last_interaction: f64,
    #[serde(rename = "queuedEvents")]
    pub queued_events: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomStateDto {
    #[serde(rename = "roomName")]
    pub room_name: String,
    #[serde(rename = "memberCount")]
    pub member_count: usize,
    pub members: Vec<MemberStateDto>,
}
