//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! ルーム名 → Room の HashMap を単一の `RwLock` で保護します。
//!
//! ## ロックの順序
//!
//! Registry → Room の順でのみ取得します。Room の操作が Registry のロックを
//! 取ることはないため、スイープ中に Room のロックを待ってもデッドロックしません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    RepositoryError, Room, RoomConfig, RoomName, RoomRepository, RoomSnapshot, SweepReport,
};

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    /// ルーム名 → Room
    rooms: RwLock<HashMap<RoomName, Arc<Room>>>,
    /// 新規作成する Room に適用する設定
    room_config: RoomConfig,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new(room_config: RoomConfig) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            room_config,
        }
    }

    fn build_room(&self, name: RoomName) -> Arc<Room> {
        tracing::info!("Room '{}' created", name);
        Arc::new(Room::new(name, self.room_config.clone()))
    }
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn create(&self, name: RoomName) -> Result<Arc<Room>, RepositoryError> {
        let mut rooms = self.rooms.write().await;
        if rooms.contains_key(&name) {
            return Err(RepositoryError::AlreadyExists(name));
        }
        let room = self.build_room(name.clone());
        rooms.insert(name, Arc::clone(&room));
        Ok(room)
    }

    async fn get_or_create(&self, name: RoomName) -> Arc<Room> {
        if let Some(room) = self.rooms.read().await.get(&name) {
            return Arc::clone(room);
        }

        let mut rooms = self.rooms.write().await;
        let room = rooms
            .entry(name)
            .or_insert_with_key(|name| self.build_room(name.clone()));
        Arc::clone(room)
    }

    async fn get(&self, name: &RoomName) -> Result<Arc<Room>, RepositoryError> {
        self.rooms
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(name.clone()))
    }

    async fn exists(&self, name: &RoomName) -> bool {
        self.rooms.read().await.contains_key(name)
    }

    async fn remove(&self, name: &RoomName) -> bool {
        let mut rooms = self.rooms.write().await;
        let Some(room) = rooms.remove(name) else {
            return false;
        };
        room.dispose().await;
        tracing::info!("Room '{}' removed", name);
        true
    }

    async fn sweep(&self) -> SweepReport {
        let mut rooms = self.rooms.write().await;
        let mut report = SweepReport::default();

        for (name, room) in rooms.iter() {
            let evictions = room.sweep_inactive().await;
            if !evictions.is_empty() {
                report.evictions.push((name.clone(), evictions));
            }
            if room.close_if_empty().await {
                report.removed_rooms.push(name.clone());
            }
        }

        for name in &report.removed_rooms {
            rooms.remove(name);
        }

        if !report.removed_rooms.is_empty() {
            tracing::info!(
                "Removed {} empty rooms: {:?}",
                report.removed_rooms.len(),
                report.removed_rooms
            );
        }
        report
    }

    async fn snapshot(&self) -> Vec<RoomSnapshot> {
        let rooms = self.rooms.read().await;
        let mut snapshots = Vec::with_capacity(rooms.len());
        for (name, room) in rooms.iter() {
            let members = room.snapshot().await;
            snapshots.push(RoomSnapshot {
                name: name.clone(),
                member_count: members.len(),
                members,
            });
        }
        snapshots.sort_by(|a, b| a.name.cmp(&b.name));
        snapshots
    }

    async fn dispose_all(&self) {
        let mut rooms = self.rooms.write().await;
        for (_, room) in rooms.drain() {
            room.dispose().await;
        }
        tracing::info!("All rooms disposed");
    }
}
