//! Background sweep of the room registry.

use std::{sync::Arc, time::Duration};

use tokio::{
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::usecase::SweepRoomsUseCase;

pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ReaperConfig {
    pub interval: Duration,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

/// Runs the registry sweep at a fixed interval until canceled.
pub struct Reaper;

impl Reaper {
    pub fn spawn(
        sweep: Arc<SweepRoomsUseCase>,
        config: ReaperConfig,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        // `interval` panics on a zero period.
        let period = config.interval.max(Duration::from_millis(1));

        tokio::spawn(async move {
            tracing::info!("Reaper started (every {:?})", period);
            let mut ticker = time::interval_at(time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        sweep.execute().await;
                    }
                }
            }
            tracing::info!("Reaper stopped");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{RoomConfig, RoomName, RoomRepository, UserId},
        infrastructure::repository::InMemoryRoomRepository,
    };

    #[tokio::test(start_paused = true)]
    async fn test_reaper_removes_idle_room_and_stops_on_cancel() {
        // テスト項目: Reaper が定期的にスイープし、キャンセルで停止する
        // given (前提条件):
        let config = RoomConfig {
            inactivity_timeout: Duration::from_secs(10),
            ..RoomConfig::default()
        };
        let repository = Arc::new(InMemoryRoomRepository::new(config));
        let alpha = RoomName::new("alpha".to_string()).unwrap();
        repository
            .get_or_create(alpha.clone())
            .await
            .add_user(UserId::new("a".to_string()).unwrap())
            .await
            .unwrap();
        let cancel = CancellationToken::new();
        let handle = Reaper::spawn(
            Arc::new(SweepRoomsUseCase::new(repository.clone())),
            ReaperConfig {
                interval: Duration::from_secs(5),
            },
            cancel.clone(),
        );

        // when (操作):
        time::sleep(Duration::from_secs(16)).await;

        // then (期待する結果):
        assert!(!repository.exists(&alpha).await);
        cancel.cancel();
        assert!(handle.await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reaper_keeps_active_room() {
        // テスト項目: タイムアウト前のメンバーがいる Room は削除されない
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::default());
        let alpha = RoomName::new("alpha".to_string()).unwrap();
        repository
            .get_or_create(alpha.clone())
            .await
            .add_user(UserId::new("a".to_string()).unwrap())
            .await
            .unwrap();
        let cancel = CancellationToken::new();
        let handle = Reaper::spawn(
            Arc::new(SweepRoomsUseCase::new(repository.clone())),
            ReaperConfig::default(),
            cancel.clone(),
        );

        // when (操作):
        time::sleep(Duration::from_secs(31)).await;
        cancel.cancel();
        handle.await.unwrap();

        // then (期待する結果):
        assert!(repository.exists(&alpha).await);
    }
}
