//! UseCase: イベントストリームの購読

use std::sync::Arc;

use crate::domain::{EventStream, RoomName, RoomRepository, UserId};

use super::error::FetchEventsError;

/// イベント購読のユースケース
pub struct SubscribeEventsUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl SubscribeEventsUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// ユーザーのメールボックスにストリームを接続する
    ///
    /// 1 つのメールボックスに接続できるストリームは 1 つだけです。
    /// ストリームはユーザーが退出するとキューを出し切ってから終了します。
    pub async fn execute(
        &self,
        room_name: &RoomName,
        user_id: &UserId,
    ) -> Result<EventStream, FetchEventsError> {
        let room = self.repository.get(room_name).await?;
        let stream = room.get_events_stream(user_id).await?;
        tracing::info!("Stream attached: room '{}', user '{}'", room_name, user_id);
        Ok(stream)
    }
}
