//! WebRTC signaling relay.
//!
//! Peers join named rooms, relay offers / answers / ICE candidates to each
//! other through bounded per-user mailboxes, and read their events either as
//! a Server-Sent Events stream or by polling.

pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

#[cfg(test)]
mod test_support;
