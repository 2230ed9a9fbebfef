//! UseCase: チャンネル参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinChannelUseCase::execute() メソッド
//! - Room の取得または作成と、ユーザーの追加
//!
//! ### なぜこのテストが必要か
//! - 初回参加で Room が作られ、二回目以降は既存の Room に参加することを保証する
//! - スイープで閉じられた Room への参加が新しい Room で再試行されることを確認する
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規 Room・既存 Room への参加
//! - 異常系：二重参加
//! - エッジケース：取得直後に Room が閉じられる

use std::sync::Arc;

use crate::domain::{RoomError, RoomName, RoomRepository, UserId};

use super::error::JoinChannelError;

/// A closed room is replaced by a fresh one on the next lookup, so one retry suffices.
const JOIN_ATTEMPTS: usize = 2;

/// チャンネル参加のユースケース
pub struct JoinChannelUseCase {
    /// Repository（Registry の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl JoinChannelUseCase {
    /// 新しい JoinChannelUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 参加を実行
    ///
    /// # Arguments
    ///
    /// * `room_name` - 参加する Room の名前（存在しなければ作成される）
    /// * `user_id` - 参加するユーザー
    pub async fn execute(
        &self,
        room_name: RoomName,
        user_id: UserId,
    ) -> Result<(), JoinChannelError> {
        for _ in 0..JOIN_ATTEMPTS {
            let room = self.repository.get_or_create(room_name.clone()).await;
            match room.add_user(user_id.clone()).await {
                Ok(()) => return Ok(()),
                Err(RoomError::Closed(_)) => {
                    tracing::debug!(
                        "Room '{}' closed while '{}' was joining, retrying",
                        room_name,
                        user_id
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(JoinChannelError::RoomUnavailable(room_name))
    }
}
