//! Conversion logic between domain entities and DTOs.

use signalroom_shared::time::timestamp_to_rfc3339;

use crate::domain::{Action, Event, MemberSnapshot, RoomSnapshot};
use crate::infrastructure::dto::http as dto;

// ========================================
// Domain Entity → DTO
// ========================================

impl From<Action> for dto::ActionType {
    fn from(action: Action) -> Self {
        match action {
            Action::UserJoined => Self::UserJoined,
            Action::UserLeft => Self::UserLeft,
            Action::Message => Self::Message,
        }
    }
}

impl From<Event> for dto::EventDto {
    fn from(event: Event) -> Self {
        Self {
            time: timestamp_to_rfc3339(event.timestamp.value()),
            action_type: event.action.into(),
            user_id: event.origin.into_string(),
            data: event.payload,
        }
    }
}

impl From<MemberSnapshot> for dto::MemberStateDto {
    fn from(member: MemberSnapshot) -> Self {
        Self {
            user_id: member.user_id.into_string(),
            seconds_since_last_interaction: member.seconds_since_last_activity,
            queued_events: member.queued_events,
        }
    }
}

impl From<RoomSnapshot> for dto::RoomStateDto {
    fn from(room: RoomSnapshot) -> Self {
        Self {
            room_name: room.name.into_string(),
            member_count: room.member_count,
            members: room.members.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RoomName, Timestamp, UserId};
    use serde_json::json;

    #[test]
    fn test_message_event_to_dto() {
        // テスト項目: Message イベントが DTO に変換され、ペイロードがそのまま保持される
        // given (前提条件):
        let payload = json!({"type": "offer"}).as_object().cloned().unwrap();
        let event = Event {
            timestamp: Timestamp::new(1672531200000),
            action: Action::Message,
            origin: UserId::new("B".to_string()).unwrap(),
            payload: Some(payload.clone()),
        };

        // when (操作):
        let converted: dto::EventDto = event.into();

        // then (期待する結果):
        assert_eq!(converted.time, "2023-01-01T00:00:00.000Z");
        assert_eq!(converted.action_type, dto::ActionType::Message);
        assert_eq!(converted.user_id, "B");
        assert_eq!(converted.data, Some(payload));
    }

    #[test]
    fn test_event_dto_wire_shape() {
        // テスト項目: UserJoined イベントの JSON 表現がクライアントとの契約通りになる
        // given (前提条件):
        let event = Event {
            timestamp: Timestamp::new(1672531200000),
            action: Action::UserJoined,
            origin: UserId::new("B".to_string()).unwrap(),
            payload: None,
        };

        // when (操作):
        let value = serde_json::to_value(dto::EventDto::from(event)).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            json!({
                "time": "2023-01-01T00:00:00.000Z",
                "actionType": "user joined",
                "userID": "B",
                "data": null
            })
        );
    }

    #[test]
    fn test_room_snapshot_to_dto() {
        // テスト項目: RoomSnapshot が RoomStateDto に変換される
        // given (前提条件):
        let snapshot = RoomSnapshot {
            name: RoomName::new("alpha".to_string()).unwrap(),
            member_count: 1,
            members: vec![MemberSnapshot {
                user_id: UserId::new("a".to_string()).unwrap(),
                seconds_since_last_activity: 1.5,
                queued_events: 3,
            }],
        };

        // when (操作):
        let converted: dto::RoomStateDto = snapshot.into();

        // then (期待する結果):
        assert_eq!(converted.room_name, "alpha");
        assert_eq!(converted.member_count, 1);
        assert_eq!(converted.members[0].user_id, "a");
        assert_eq!(converted.members[0].queued_events, 3);
    }
}
