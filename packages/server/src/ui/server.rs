//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{
    handler::{
        collect_events, debug_rooms, join_channel, leave_channel, login, ping, record_resolution,
        register, remove_room, send_to_peer, subscribe_events,
    },
    observability::track_requests,
    state::AppState,
};

/// Build the HTTP router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // 認証
        .route("/ping", get(ping))
        .route("/login", post(login))
        .route("/register", post(register))
        // チャンネル
        .route("/channel/join", post(join_channel))
        .route("/channel/leave", post(leave_channel))
        .route("/channel/subscribe", get(subscribe_events))
        .route("/channel/collect", post(collect_events))
        .route("/peer/send", post(send_to_peer))
        .route("/room/delete", delete(remove_room))
        // 計測・デバッグ
        .route("/metrics/resolution", post(record_resolution))
        .route("/debug/rooms", get(debug_rooms))
        .with_state(state)
        .layer(middleware::from_fn(track_requests))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// WebRTC signaling server
///
/// # Example
///
/// ```ignore
/// let state = Arc::new(AppState::new(repository, Duration::from_secs(5)));
/// Server::new(state)
///     .run("127.0.0.1".to_string(), 8080, shutdown_signal())
///     .await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Run the server until `shutdown` resolves
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    /// * `shutdown` - Future that triggers graceful shutdown. It must close the
    ///   mailboxes, otherwise attached SSE streams keep the server alive.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run<F>(
        self,
        host: String,
        port: u16,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = router(self.state);

        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("Signaling server listening on {}", listener.local_addr()?);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
