//! HTTP signaling server implementation.

mod error;
mod extract;
mod handler;
mod observability;
mod reaper;
mod server;
mod session;
mod signal;
pub mod state;

pub use error::ApiError;
pub use reaper::{Reaper, ReaperConfig};
pub use server::{Server, router};
pub use session::SessionStore;
pub use signal::shutdown_signal;
pub use state::AppState;
