//! UseCase: Room の削除

use std::sync::Arc;

use crate::domain::{RoomName, RoomRepository};

/// Room 削除のユースケース
pub struct RemoveRoomUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl RemoveRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// Room を削除し、全メンバーのメールボックスを閉じる
    ///
    /// Room が存在しなかった場合は `false` を返します。
    pub async fn execute(&self, room_name: &RoomName) -> bool {
        self.repository.remove(room_name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MockRoomRepository, UserId},
        infrastructure::repository::InMemoryRoomRepository,
    };

    fn name(value: &str) -> RoomName {
        RoomName::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_remove_room_with_members() {
        // テスト項目: メンバーがいる Room を削除すると、ストリームが終了する
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::default());
        let room = repository.get_or_create(name("alpha")).await;
        let a = UserId::new("a".to_string()).unwrap();
        room.add_user(a.clone()).await.unwrap();
        let mut stream = room.get_events_stream(&a).await.unwrap();
        let usecase = RemoveRoomUseCase::new(repository.clone());

        // when (操作):
        let removed = usecase.execute(&name("alpha")).await;

        // then (期待する結果):
        assert!(removed);
        assert!(!repository.exists(&name("alpha")).await);
        assert!(stream.next_event().await.is_none());
    }

    #[tokio::test]
    async fn test_remove_unknown_room() {
        // テスト項目: 存在しない Room の削除は false
        // given (前提条件):
        let mut repository = MockRoomRepository::new();
        repository.expect_remove().times(1).return_const(false);
        let usecase = RemoveRoomUseCase::new(Arc::new(repository));

        // when (操作):
        let removed = usecase.execute(&name("nowhere")).await;

        // then (期待する結果):
        assert!(!removed);
    }
}
