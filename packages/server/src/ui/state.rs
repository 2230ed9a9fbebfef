//! Server state shared by every handler.

use std::{sync::Arc, time::Duration};

use crate::{
    domain::RoomRepository,
    usecase::{
        CollectEventsUseCase, GetRoomsStateUseCase, JoinChannelUseCase, LeaveChannelUseCase,
        RecordResolutionUseCase, RemoveRoomUseCase, SendToPeerUseCase, SubscribeEventsUseCase,
    },
};

use super::session::SessionStore;

/// Shared application state
pub struct AppState {
    /// JoinChannelUseCase（チャンネル参加のユースケース）
    pub join_channel_usecase: Arc<JoinChannelUseCase>,
    /// LeaveChannelUseCase（チャンネル退出のユースケース）
    pub leave_channel_usecase: Arc<LeaveChannelUseCase>,
    /// SendToPeerUseCase（ピア送信のユースケース）
    pub send_to_peer_usecase: Arc<SendToPeerUseCase>,
    /// CollectEventsUseCase（イベント一括取得のユースケース）
    pub collect_events_usecase: Arc<CollectEventsUseCase>,
    /// SubscribeEventsUseCase（イベント購読のユースケース）
    pub subscribe_events_usecase: Arc<SubscribeEventsUseCase>,
    /// RemoveRoomUseCase（Room 削除のユースケース）
    pub remove_room_usecase: Arc<RemoveRoomUseCase>,
    /// GetRoomsStateUseCase（Room 状態取得のユースケース）
    pub get_rooms_state_usecase: Arc<GetRoomsStateUseCase>,
    /// RecordResolutionUseCase（解像度記録のユースケース）
    pub record_resolution_usecase: Arc<RecordResolutionUseCase>,
    /// ログイン済みセッション
    pub sessions: SessionStore,
    /// `/peer/send` がレートリミッタで待機できる最大時間
    pub send_timeout: Duration,
}

impl AppState {
    /// Wire every usecase to the same repository.
    pub fn new(repository: Arc<dyn RoomRepository>, send_timeout: Duration) -> Self {
        Self {
            join_channel_usecase: Arc::new(JoinChannelUseCase::new(repository.clone())),
            leave_channel_usecase: Arc::new(LeaveChannelUseCase::new(repository.clone())),
            send_to_peer_usecase: Arc::new(SendToPeerUseCase::new(repository.clone())),
            collect_events_usecase: Arc::new(CollectEventsUseCase::new(repository.clone())),
            subscribe_events_usecase: Arc::new(SubscribeEventsUseCase::new(repository.clone())),
            remove_room_usecase: Arc::new(RemoveRoomUseCase::new(repository.clone())),
            get_rooms_state_usecase: Arc::new(GetRoomsStateUseCase::new(repository)),
            record_resolution_usecase: Arc::new(RecordResolutionUseCase::new()),
            sessions: SessionStore::default(),
            send_timeout,
        }
    }
}
