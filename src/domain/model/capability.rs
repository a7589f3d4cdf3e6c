use serde::Serialize;
use utoipa::ToSchema;

/// リクエストごとに選択されるケイパビリティ
/// レスポンスに付加する追加情報の種類を表す
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Capability {
    /// 追加情報なし
    #[default]
    None,
    /// 価格情報を付加する
    Price,
}

impl Capability {
    /// `Capability` ヘッダーの値から作成
    /// 認識できない値は追加情報なしとして扱う
    pub fn from_header_value(value: Option<&str>) -> Self {
        match value {
            Some("price") => Capability::Price,
            _ => Capability::None,
        }
    }
}

/// 価格ケイパビリティ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Price {
    price: i64,
    currency: String,
}

impl Price {
    pub fn new(price: i64, currency: impl Into<String>) -> Self {
        Self {
            price,
            currency: currency.into(),
        }
    }

    pub fn price(&self) -> i64 {
        self.price
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// 価格を加算する
    /// 同じ予約のユニットは同じ商品の価格を共有するため、通貨は加算側のものを採用する
    pub fn accumulate(&self, other: &Price) -> Price {
        Price {
            price: self.price + other.price,
            currency: other.currency.clone(),
        }
    }
}

/// 価格を付加したエンティティ
/// 元のフィールドと価格フィールドをフラットに並べてシリアライズする
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Priced<T> {
    #[serde(flatten)]
    base: T,
    #[serde(flatten)]
    price: Price,
}

impl<T> Priced<T> {
    pub fn new(base: T, price: Price) -> Self {
        Self { base, price }
    }

    pub fn base(&self) -> &T {
        &self.base
    }

    pub fn price(&self) -> &Price {
        &self.price
    }
}

/// ケイパビリティ軸で分岐するエンティティの共通インターフェース
pub trait CapabilityView {
    type Base;

    /// 元のフィールド
    fn base(&self) -> &Self::Base;

    /// 価格（価格ケイパビリティの場合のみ）
    fn price(&self) -> Option<&Price>;

    /// この表現に対応するケイパビリティ
    fn capability(&self) -> Capability {
        match self.price() {
            Some(_) => Capability::Price,
            None => Capability::None,
        }
    }
}
