//! UseCase: ピアへのシグナリングメッセージ送信
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendToPeerUseCase::execute() メソッド
//! - 宛先ユーザーのメールボックスへの配送
//!
//! ### なぜこのテストが必要か
//! - 送信者・宛先の双方が Room のメンバーであることを保証する
//! - レートリミッタの待機がキャンセルされた場合に Canceled を返すことを確認する
//!
//! ### どのような状況を想定しているか
//! - 正常系：offer / answer の配送
//! - 異常系：存在しない Room、非メンバーへの送信、キャンセル

use std::sync::Arc;

use serde_json::Value;

use crate::domain::{Delivery, Payload, RoomName, RoomRepository, SendContext, UserId};

use super::error::SendToPeerError;

/// Payload key carrying the WebRTC signaling message kind.
const MESSAGE_TYPE_KEY: &str = "messageType";
/// Message kind that completes an offer/answer exchange.
const ANSWER_MESSAGE_TYPE: &str = "answer";

/// ピア送信のユースケース
pub struct SendToPeerUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl SendToPeerUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 送信を実行
    ///
    /// 宛先のメールボックスが満杯の場合でも送信は成功扱いとなり、
    /// 宛先は次回のスイープで退出させられます。
    ///
    /// `answer` が宛先のメールボックスに入った場合、送信者の参加からの経過時間を
    /// `webrtc_connection_creation_time` ヒストグラムに記録します。
    pub async fn execute(
        &self,
        ctx: &SendContext,
        room_name: &RoomName,
        from: &UserId,
        to: &UserId,
        payload: Payload,
    ) -> Result<Delivery, SendToPeerError> {
        let room = self.repository.get(room_name).await?;
        let completes_connection = payload.get(MESSAGE_TYPE_KEY).and_then(Value::as_str)
            == Some(ANSWER_MESSAGE_TYPE);

        let delivery = room.send_to_user(ctx, from, to, payload).await?;

        if completes_connection && delivery.enqueued {
            let age = delivery.sender_membership_age();
            metrics::histogram!(
                "webrtc_connection_creation_time",
                "room_name" => room_name.to_string()
            )
            .record(age.as_secs_f64());
            tracing::debug!(
                "Room '{}': connection between '{}' and '{}' answered after {:?}",
                room_name,
                from,
                to,
                age
            );
        }

        Ok(delivery)
    }
}
