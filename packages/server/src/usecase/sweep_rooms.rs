//! UseCase: 定期スイープ
//!
//! 非アクティブ・キュー溢れのメンバーを退出させ、空になった Room を削除します。
//! デバッグログが有効な場合はスイープ後の Registry の状態も出力します。

use std::sync::Arc;

use crate::domain::{RoomRepository, SweepReport};

pub struct SweepRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl SweepRoomsUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self) -> SweepReport {
        let report = self.repository.sweep().await;

        tracing::debug!(
            "Sweep finished: {} evicted, {} rooms removed",
            report.evicted_count(),
            report.removed_rooms.len()
        );
        if tracing::enabled!(tracing::Level::DEBUG) {
            for room in self.repository.snapshot().await {
                tracing::debug!(
                    "Room '{}': {} members, queued {:?}",
                    room.name,
                    room.member_count,
                    room.members
                        .iter()
                        .map(|m| (m.user_id.as_str(), m.queued_events))
                        .collect::<Vec<_>>()
                );
            }
        }

        report
    }
}
