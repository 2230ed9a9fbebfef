//! Request handlers.

mod http;
mod sse;

pub use http::{
    collect_events, debug_rooms, join_channel, leave_channel, login, ping, record_resolution,
    register, remove_room, send_to_peer,
};
pub use sse::subscribe_events;
