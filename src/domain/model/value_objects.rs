use crate::domain::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;
use uuid::Uuid;

use std::fmt;
use std::num::ParseIntError;

/// 数値IDの値オブジェクトを定義する
/// ストレージ上は整数、外部境界ではJSON文字列として扱う
macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ToSchema)]
        #[schema(value_type = String, example = "42")]
        pub struct $name(i64);

        impl $name {
            /// 整数値から作成
            pub fn new(value: i64) -> Self {
                Self(value)
            }

            /// 文字列から作成
            pub fn from_string(s: &str) -> Result<Self, ParseIntError> {
                Ok(Self(s.parse::<i64>()?))
            }

            /// 内部の整数値を取得
            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::from_string(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

numeric_id!(
    /// 商品の識別子
    ProductId
);
numeric_id!(
    /// 空き枠（商品×日付）の識別子
    AvailabilityId
);
numeric_id!(
    /// 予約の識別子
    BookingId
);
numeric_id!(
    /// 予約ユニットの識別子
    UnitId
);
numeric_id!(
    /// ユーザーの識別子
    UserId
);

/// 予約ステータス
/// RESERVED → CONFIRMED の一方向にのみ遷移する
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// 空き枠を確保済み
    Reserved,
    /// 確定済み（チケット発行済み）
    Confirmed,
}

impl BookingStatus {
    /// ストレージ上の文字列表現
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Reserved => "RESERVED",
            BookingStatus::Confirmed => "CONFIRMED",
        }
    }

    /// 文字列からステータスを作成
    pub fn from_string(s: &str) -> Result<Self, DomainError> {
        match s {
            "RESERVED" => Ok(BookingStatus::Reserved),
            "CONFIRMED" => Ok(BookingStatus::Confirmed),
            _ => Err(DomainError::InvalidValue(format!(
                "無効な予約ステータス: {}",
                s
            ))),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 空き枠のステータス
/// 保存せず、常に空き数から導出する
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityStatus {
    Available,
    SoldOut,
}

impl AvailabilityStatus {
    /// 空き数からステータスを導出
    pub fn from_vacancies(vacancies: i32) -> Self {
        if vacancies > 0 {
            AvailabilityStatus::Available
        } else {
            AvailabilityStatus::SoldOut
        }
    }
}

/// ユニットに発行されるチケット
/// URLセーフな固定長の不透明な文字列
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct Ticket(String);

impl Ticket {
    /// チケットの文字数
    pub const LENGTH: usize = 32;

    /// 新しいランダムなチケットを生成
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// 保存済みの値から作成
    pub fn from_string(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
