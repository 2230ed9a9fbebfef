//! Data Transfer Objects (DTOs) for the signaling relay.
//!
//! - `http`: HTTP request / response bodies (and the event wire shape shared with SSE)
//! - `subscription`: the `<room>__<user>` subscription identifier
//! - `conversion`: Domain → DTO conversions

pub mod conversion;
pub mod http;
pub mod subscription;
