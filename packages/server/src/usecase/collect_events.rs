//! UseCase: 溜まっているイベントの一括取得

use std::sync::Arc;

use crate::domain::{Event, RoomName, RoomRepository, UserId};

use super::error::FetchEventsError;

/// イベント一括取得のユースケース
pub struct CollectEventsUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl CollectEventsUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// メールボックスに溜まっているイベントを全て取り出す
    ///
    /// ストリームが接続中の場合は空の一覧を返します。
    pub async fn execute(
        &self,
        room_name: &RoomName,
        user_id: &UserId,
    ) -> Result<Vec<Event>, FetchEventsError> {
        let room = self.repository.get(room_name).await?;
        Ok(room.get_events_batch(user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::Action, infrastructure::repository::InMemoryRoomRepository};

    fn name(value: &str) -> RoomName {
        RoomName::new(value.to_string()).unwrap()
    }

    fn user(value: &str) -> UserId {
        UserId::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_collect_returns_pending_events_in_order() {
        // テスト項目: 他のユーザーの参加・退出イベントが順番通りに取得できる
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::default());
        let room = repository.get_or_create(name("alpha")).await;
        room.add_user(user("a")).await.unwrap();
        room.add_user(user("b")).await.unwrap();
        room.remove_user(&user("b")).await.unwrap();
        let usecase = CollectEventsUseCase::new(repository);

        // when (操作):
        let events = usecase.execute(&name("alpha"), &user("a")).await.unwrap();

        // then (期待する結果):
        let actions: Vec<_> = events.iter().map(|e| (e.action, e.origin.clone())).collect();
        assert_eq!(
            actions,
            vec![
                (Action::UserJoined, user("b")),
                (Action::UserLeft, user("b")),
            ]
        );
        assert!(usecase
            .execute(&name("alpha"), &user("a"))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_collect_not_member() {
        // テスト項目: メンバーでないユーザーの取得は NotMember
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::default());
        repository.get_or_create(name("alpha")).await;
        let usecase = CollectEventsUseCase::new(repository);

        // when (操作):
        let result = usecase.execute(&name("alpha"), &user("a")).await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), FetchEventsError::NotMember(user("a")));
    }
}
