//! UseCase: Room 状態の取得（デバッグ用）

use std::sync::Arc;

use crate::domain::{RoomRepository, RoomSnapshot};

pub struct GetRoomsStateUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomsStateUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 全 Room のメンバーとキューの状態を名前順で返す
    pub async fn execute(&self) -> Vec<RoomSnapshot> {
        self.repository.snapshot().await
    }
}
