//! Value Object 定義
//!
//! ルーム名・ユーザー ID・タイムスタンプをバリデーション済みの型として表現します。
//! UI 層で生の文字列から変換し、ドメイン層以降では常にこれらの型を扱います。

use std::fmt;

use super::error::ValueObjectError;

/// Separator reserved for subscription identifiers (`<room>__<user>`).
pub const SUBSCRIPTION_SEPARATOR: &str = "__";

/// A name may not start or end with this, or `<room>__<user>` stops splitting
/// back into the same pair (`team_` + `bob` reads as `team` + `_bob`).
const SEPARATOR_CHAR: char = '_';

/// Maximum length (in characters) for user IDs and room names.
pub const MAX_NAME_LENGTH: usize = 128;

fn validate_name(kind: &'static str, value: &str) -> Result<(), ValueObjectError> {
    if value.trim().is_empty() {
        return Err(ValueObjectError::Empty(kind));
    }
    if value.chars().count() > MAX_NAME_LENGTH {
        return Err(ValueObjectError::TooLong {
            kind,
            max: MAX_NAME_LENGTH,
        });
    }
    if value.contains(SUBSCRIPTION_SEPARATOR)
        || value.starts_with(SEPARATOR_CHAR)
        || value.ends_with(SEPARATOR_CHAR)
    {
        return Err(ValueObjectError::ReservedSeparator(kind));
    }
    Ok(())
}

/// ユーザー ID
///
/// ルーム内で一意。発行と失効は認証層の責務で、ここでは一意性のみを前提とします。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_name("user id", &value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ルーム名
///
/// Registry 内で一意で、ルームの生存期間中は変わりません。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomName(String);

impl RoomName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_name("room name", &value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unix timestamp in milliseconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn now() -> Self {
        Self(signalroom_shared::time::get_utc_timestamp())
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
