//! Utilities shared by every signalroom binary.

pub mod logger;
pub mod time;
