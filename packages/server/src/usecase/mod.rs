//! UseCase 層
//!
//! HTTP ハンドラやバックグラウンドタスクから呼ばれる操作を 1 ユースケース 1 構造体で提供します。
//! 各ユースケースは `RoomRepository` trait にのみ依存します。

mod collect_events;
pub mod error;
mod get_rooms_state;
mod join_channel;
mod leave_channel;
mod record_resolution;
mod remove_room;
mod send_to_peer;
mod subscribe_events;
mod sweep_rooms;

pub use collect_events::CollectEventsUseCase;
pub use error::{FetchEventsError, JoinChannelError, LeaveChannelError, SendToPeerError};
pub use get_rooms_state::GetRoomsStateUseCase;
pub use join_channel::JoinChannelUseCase;
pub use leave_channel::LeaveChannelUseCase;
pub use record_resolution::RecordResolutionUseCase;
pub use remove_room::RemoveRoomUseCase;
pub use send_to_peer::SendToPeerUseCase;
pub use subscribe_events::SubscribeEventsUseCase;
pub use sweep_rooms::SweepRoomsUseCase;
