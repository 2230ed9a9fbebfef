//! UseCase: チャンネル退出処理

use std::sync::Arc;

use crate::domain::{RoomName, RoomRepository, UserId};

use super::error::LeaveChannelError;

/// チャンネル退出のユースケース
pub struct LeaveChannelUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl LeaveChannelUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 退出を実行
    ///
    /// Room は空になっても残り、次回のスイープで削除されます。
    pub async fn execute(
        &self,
        room_name: &RoomName,
        user_id: &UserId,
    ) -> Result<(), LeaveChannelError> {
        let room = self.repository.get(room_name).await?;
        room.remove_user(user_id).await?;
        Ok(())
    }
}
