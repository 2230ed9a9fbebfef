//! Repository 実装
//!
//! - `inmemory`: HashMap を使ったプロセス内 Registry
//! - 永続化・複数ノード共有は対象外

pub mod inmemory;

pub use inmemory::InMemoryRoomRepository;
