//! WebRTC signaling server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin signalroom-server
//! cargo run --bin signalroom-server -- --host 0.0.0.0 --port 3000
//! SIGNALROOM_SWEEP_INTERVAL_SECS=30 cargo run --bin signalroom-server
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use signalroom_server::{
    domain::{RoomConfig, RoomRepository},
    infrastructure::repository::InMemoryRoomRepository,
    ui::{AppState, Reaper, ReaperConfig, Server, shutdown_signal},
    usecase::SweepRoomsUseCase,
};
use signalroom_shared::logger::setup_logger;
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(name = "signalroom-server")]
#[command(about = "Signaling relay for WebRTC peers", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "SIGNALROOM_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "SIGNALROOM_PORT", default_value = "8080")]
    port: u16,

    /// Events a mailbox holds before further events are dropped
    #[arg(long, env = "SIGNALROOM_MAILBOX_CAPACITY", default_value = "100")]
    mailbox_capacity: usize,

    /// Queue depth above which the sweep evicts a member
    #[arg(long, env = "SIGNALROOM_OVERFLOW_THRESHOLD", default_value = "40")]
    overflow_threshold: usize,

    /// Seconds without activity after which the sweep evicts a member
    #[arg(long, env = "SIGNALROOM_INACTIVITY_TIMEOUT_SECS", default_value = "300")]
    inactivity_timeout_secs: u64,

    /// Sustained relayed messages per second, per room
    #[arg(long, env = "SIGNALROOM_RATE_LIMIT", default_value = "100")]
    rate_limit: u32,

    /// Relayed message burst, per room
    #[arg(long, env = "SIGNALROOM_RATE_BURST", default_value = "200")]
    rate_burst: u32,

    /// Seconds between registry sweeps
    #[arg(
        long,
        env = "SIGNALROOM_SWEEP_INTERVAL_SECS",
        default_value = "10",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    sweep_interval_secs: u64,

    /// Seconds a send may wait for the room's rate limiter
    #[arg(long, env = "SIGNALROOM_SEND_TIMEOUT_SECS", default_value = "5")]
    send_timeout_secs: u64,
}

impl Args {
    fn room_config(&self) -> RoomConfig {
        RoomConfig {
            mailbox_capacity: self.mailbox_capacity,
            overflow_threshold: self.overflow_threshold,
            inactivity_timeout: Duration::from_secs(self.inactivity_timeout_secs),
            rate_limit_per_second: self.rate_limit,
            rate_limit_burst: self.rate_burst,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    tracing::debug!("{:?}", args);

    // Initialize dependencies in order:
    // 1. Repository (Registry)
    // 2. AppState (UseCases, sessions)
    // 3. Reaper
    // 4. Server

    // 1. Create Repository (in-memory registry)
    let repository = Arc::new(InMemoryRoomRepository::new(args.room_config()));

    // 2. Create AppState
    let state = Arc::new(AppState::new(
        repository.clone(),
        Duration::from_secs(args.send_timeout_secs),
    ));

    // 3. Start the Reaper
    let cancel = CancellationToken::new();
    let reaper = Reaper::spawn(
        Arc::new(SweepRoomsUseCase::new(repository.clone())),
        ReaperConfig {
            interval: Duration::from_secs(args.sweep_interval_secs),
        },
        cancel.clone(),
    );

    // 4. Run the server
    // Mailboxes are closed on shutdown so attached SSE streams end and
    // graceful shutdown can complete.
    let shutdown = {
        let cancel = cancel.clone();
        let repository = repository.clone();
        async move {
            shutdown_signal().await;
            cancel.cancel();
            repository.dispose_all().await;
        }
    };
    let result = Server::new(state)
        .run(args.host, args.port, shutdown)
        .await;

    cancel.cancel();
    if let Err(e) = reaper.await {
        tracing::error!("Reaper task failed: {}", e);
    }
    if let Err(e) = result {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
