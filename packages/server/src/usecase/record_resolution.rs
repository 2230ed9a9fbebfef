//! UseCase: 映像ストリームの解像度の記録

use crate::domain::RoomName;

/// クライアントが報告した受信映像の高さを `stream_resolution` ゲージに記録する
///
/// Room の状態には触れないため Repository を持ちません。
#[derive(Default)]
pub struct RecordResolutionUseCase;

impl RecordResolutionUseCase {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self, room_name: &RoomName, height: u32) {
        metrics::gauge!("stream_resolution", "room_name" => room_name.to_string())
            .set(f64::from(height));
        tracing::debug!("Room '{}': stream resolution {}p", room_name, height);
    }
}
