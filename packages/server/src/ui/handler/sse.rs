//! Server-Sent Events endpoint.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::sse::{Event as SseEvent, KeepAlive, Sse},
};
use futures_util::{Stream, StreamExt};

use crate::{
    infrastructure::dto::{
        http::{EventDto, SubscriptionQuery},
        subscription::SubscriptionId,
    },
    ui::{error::ApiError, state::AppState},
};

/// SSE event name of every frame.
const SSE_EVENT_NAME: &str = "message";

/// Stream the events of a subscription until its mailbox is closed.
///
/// Only one stream per subscription may be attached at a time.
pub async fn subscribe_events(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SubscriptionQuery>,
) -> Result<Sse<impl Stream<Item = Result<SseEvent, axum::Error>>>, ApiError> {
    let subscription: SubscriptionId = query.subscription_id.parse()?;
    let events = state
        .subscribe_events_usecase
        .execute(&subscription.room, &subscription.user)
        .await?;

    let frames = events.map(|event| {
        SseEvent::default()
            .event(SSE_EVENT_NAME)
            .json_data(EventDto::from(event))
    });

    Ok(Sse::new(frames).keep_alive(KeepAlive::default()))
}
