//! Subscription identifier: `<roomName>__<userID>`.
//!
//! Presentation-only addressing of a mailbox; parsed before reaching the core.

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::domain::{
    RoomName, UserId, ValueObjectError, value_object::SUBSCRIPTION_SEPARATOR,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscriptionIdError {
    #[error("subscriptionID must look like <room>__<user>")]
    MissingSeparator,

    #[error("invalid subscriptionID: {0}")]
    Invalid(#[from] ValueObjectError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionId {
    pub room: RoomName,
    pub user: UserId,
}

impl SubscriptionId {
    pub fn new(room: RoomName, user: UserId) -> Self {
        Self { room, user }
    }
}

impl FromStr for SubscriptionId {
    type Err = SubscriptionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (room, user) = s
            .split_once(SUBSCRIPTION_SEPARATOR)
            .ok_or(SubscriptionIdError::MissingSeparator)?;
        Ok(Self {
            room: RoomName::new(room.to_string())?,
            user: UserId::new(user.to_string())?,
        })
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.room, SUBSCRIPTION_SEPARATOR, self.user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subscription_id() {
        // テスト項目: "<room>__<user>" 形式の文字列を分解できる
        // given (前提条件):
        let raw = "alpha__A";

        // when (操作):
        let id: SubscriptionId = raw.parse().unwrap();

        // then (期待する結果):
        assert_eq!(id.room.as_str(), "alpha");
        assert_eq!(id.user.as_str(), "A");
        assert_eq!(id.to_string(), raw);
    }

    #[test]
    fn test_parse_rejects_missing_separator() {
        // テスト項目: 区切り文字がない場合は MissingSeparator
        // given (前提条件):
        let raw = "alpha_A";

        // when (操作):
        let result = raw.parse::<SubscriptionId>();

        // then (期待する結果):
        assert_eq!(result, Err(SubscriptionIdError::MissingSeparator));
    }

    #[test]
    fn test_parse_rejects_empty_parts() {
        // テスト項目: ルーム名・ユーザー ID が空の場合は Invalid
        // given (前提条件):
        let no_room = "__A";
        let no_user = "alpha__";

        // when (操作):
        let room_result = no_room.parse::<SubscriptionId>();
        let user_result = no_user.parse::<SubscriptionId>();

        // then (期待する結果):
        assert!(matches!(room_result, Err(SubscriptionIdError::Invalid(_))));
        assert!(matches!(user_result, Err(SubscriptionIdError::Invalid(_))));
    }

    #[test]
    fn test_parse_rejects_extra_separator() {
        // テスト項目: ユーザー ID 側に区切り文字が残る場合は Invalid
        // given (前提条件):
        let raw = "alpha__A__B";

        // when (操作):
        let result = raw.parse::<SubscriptionId>();

        // then (期待する結果):
        assert_eq!(
            result,
            Err(SubscriptionIdError::Invalid(
                ValueObjectError::ReservedSeparator("user id")
            ))
        );
    }

    #[test]
    fn test_formatted_id_parses_back_to_same_pair() {
        // テスト項目: 生成した購読 ID を解析すると同じ Room・ユーザーに戻る
        // given (前提条件):
        let pairs = [("team_alpha", "bob"), ("alpha", "b_o_b"), ("a", "b")];

        for (room, user) in pairs {
            let id = SubscriptionId::new(
                RoomName::new(room.to_string()).unwrap(),
                UserId::new(user.to_string()).unwrap(),
            );

            // when (操作):
            let parsed: SubscriptionId = id.to_string().parse().unwrap();

            // then (期待する結果):
            assert_eq!(parsed, id);
        }
    }

    #[test]
    fn test_ambiguous_names_cannot_form_an_id() {
        // テスト項目: 解析結果が変わってしまう名前（"team_" + "bob"）はそもそも生成できない
        // given (前提条件):
        let room = "team_".to_string();
        let user = "_bob".to_string();

        // when (操作):
        let room_result = RoomName::new(room);
        let user_result = UserId::new(user);

        // then (期待する結果):
        assert!(room_result.is_err());
        assert!(user_result.is_err());
        assert!(matches!(
            "team___bob".parse::<SubscriptionId>(),
            Err(SubscriptionIdError::Invalid(_))
        ));
    }
}
