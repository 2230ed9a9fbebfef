//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};

use crate::{
    domain::{RoomName, SendContext, UserId},
    infrastructure::dto::{
        http::{
            ChannelRequest, EntitiesResponse, EventDto, JoinChannelResponse, LoginRequest,
            LoginResponse, ResolutionRequest, RoomStateDto, SendToPeerRequest, StatusResponse,
            SubscriptionQuery,
        },
        subscription::SubscriptionId,
    },
    ui::{error::ApiError, extract::AuthenticatedUser, state::AppState},
};

/// Health check endpoint
pub async fn ping() -> Json<serde_json::Value> {
    Json(serde_json::json!({"info": "pong"}))
}

/// Registration is not offered; any user id can log in.
pub async fn register() -> StatusCode {
    StatusCode::NOT_IMPLEMENTED
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user_id = UserId::new(request.user_id)?;
    let token = state.sessions.login(user_id).await;
    Ok(Json(LoginResponse { token }))
}

/// Join (and create if needed) a channel; returns the subscription id used to read events.
pub async fn join_channel(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Json(request): Json<ChannelRequest>,
) -> Result<Json<JoinChannelResponse>, ApiError> {
    let room_name = RoomName::new(request.channel_name)?;
    state
        .join_channel_usecase
        .execute(room_name.clone(), user_id.clone())
        .await?;

    Ok(Json(JoinChannelResponse {
        subscription_id: SubscriptionId::new(room_name, user_id).to_string(),
    }))
}

pub async fn leave_channel(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Json(request): Json<ChannelRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let room_name = RoomName::new(request.channel_name)?;
    state
        .leave_channel_usecase
        .execute(&room_name, &user_id)
        .await?;
    Ok(Json(StatusResponse::ok()))
}

/// Relay a signaling message to one peer in the same channel.
pub async fn send_to_peer(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(from): AuthenticatedUser,
    Json(request): Json<SendToPeerRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let room_name = RoomName::new(request.channel_name)?;
    let to = UserId::new(request.destination_user_id)?;
    let ctx = SendContext::default().with_timeout(state.send_timeout);

    state
        .send_to_peer_usecase
        .execute(&ctx, &room_name, &from, &to, request.message)
        .await?;
    Ok(Json(StatusResponse::ok()))
}

/// Drain the events queued for a subscription.
pub async fn collect_events(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SubscriptionQuery>,
) -> Result<Json<EntitiesResponse>, ApiError> {
    let subscription: SubscriptionId = query.subscription_id.parse()?;
    let events = state
        .collect_events_usecase
        .execute(&subscription.room, &subscription.user)
        .await?;

    Ok(Json(EntitiesResponse {
        entities: events.into_iter().map(EventDto::from).collect(),
    }))
}

/// Remove a room and close its mailboxes. Removing an absent room succeeds.
pub async fn remove_room(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChannelRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let room_name = RoomName::new(request.channel_name)?;
    if !state.remove_room_usecase.execute(&room_name).await {
        tracing::debug!("Room '{}' was already gone", room_name);
    }
    Ok(Json(StatusResponse::ok()))
}

pub async fn record_resolution(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ResolutionRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let room_name = RoomName::new(request.room_name)?;
    state
        .record_resolution_usecase
        .execute(&room_name, request.height);
    Ok(Json(StatusResponse::ok()))
}

/// Debug endpoint to get the current registry state (for testing purposes)
pub async fn debug_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomStateDto>> {
    let rooms = state.get_rooms_state_usecase.execute().await;
    Json(rooms.into_iter().map(RoomStateDto::from).collect())
}
