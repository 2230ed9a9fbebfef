//! Repository trait 定義
//!
//! ドメイン層が必要とするルーム管理（Registry）のインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use std::sync::Arc;

use async_trait::async_trait;

use super::{
    error::RepositoryError,
    room::{Eviction, MemberSnapshot, Room},
    value_object::RoomName,
};

/// Observability view of one room.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomSnapshot {
    pub name: RoomName,
    pub member_count: usize,
    pub members: Vec<MemberSnapshot>,
}

/// Result of one registry sweep.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepReport {
    /// Evictions per room (rooms without evictions are omitted).
    pub evictions: Vec<(RoomName, Vec<Eviction>)>,
    /// Rooms found empty and removed.
    pub removed_rooms: Vec<RoomName>,
}

impl SweepReport {
    pub fn evicted_count(&self) -> usize {
        self.evictions.iter().map(|(_, e)| e.len()).sum()
    }
}

/// Room Repository trait
///
/// ルーム名から Room への対応を保持する Registry。
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
///
/// ## ロックの規約
///
/// Room の参照を取得したら Registry のロックは解放され、その後の Room 操作
/// （ブロードキャストやレートリミッタの待機）が Registry をブロックすることはない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Room を新規作成（既に存在する場合は `AlreadyExists`）
    async fn create(&self, name: RoomName) -> Result<Arc<Room>, RepositoryError>;

    /// Room を取得、存在しなければ作成（アトミック）
    async fn get_or_create(&self, name: RoomName) -> Arc<Room>;

    /// Room を取得（存在しない場合は `NotFound`）
    async fn get(&self, name: &RoomName) -> Result<Arc<Room>, RepositoryError>;

    /// Room が存在するか
    async fn exists(&self, name: &RoomName) -> bool;

    /// Room を破棄して削除。削除した場合は `true`、存在しなければ何もしない
    async fn remove(&self, name: &RoomName) -> bool;

    /// 全 Room の非アクティブなメンバーを退去させ、空になった Room を削除
    async fn sweep(&self) -> SweepReport;

    /// 全 Room の状態を取得
    async fn snapshot(&self) -> Vec<RoomSnapshot>;

    /// 全 Room を破棄（シャットダウン時）
    async fn dispose_all(&self);
}
