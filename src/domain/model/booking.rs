use crate::domain::model::capability::{CapabilityView, Price, Priced};
use crate::domain::model::{
    AvailabilityId, BookingId, BookingStatus, ProductId, Ticket, UnitId, UserId,
};
use serde::Serialize;
use utoipa::ToSchema;

/// 追加情報なしの予約ユニット
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct UnitBase {
    id: UnitId,
    ticket: Option<Ticket>,
}

impl UnitBase {
    /// ユニットを作成
    /// チケットは予約が確定している場合のみ存在する
    pub fn new(id: UnitId, ticket: Option<Ticket>) -> Self {
        Self { id, ticket }
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn ticket(&self) -> Option<&Ticket> {
        self.ticket.as_ref()
    }
}

/// 予約ユニット
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum Unit {
    Base(UnitBase),
    WithPrice(Priced<UnitBase>),
}

impl CapabilityView for Unit {
    type Base = UnitBase;

    fn base(&self) -> &UnitBase {
        match self {
            Unit::Base(base) => base,
            Unit::WithPrice(priced) => priced.base(),
        }
    }

    fn price(&self) -> Option<&Price> {
        match self {
            Unit::Base(_) => None,
            Unit::WithPrice(priced) => Some(priced.price()),
        }
    }
}

/// 追加情報なしの予約
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingBase {
    id: BookingId,
    status: BookingStatus,
    product_id: ProductId,
    availability_id: AvailabilityId,
    units: Vec<Unit>,
}

impl BookingBase {
    /// 予約を作成
    ///
    /// # Arguments
    /// * `id` - 予約ID
    /// * `status` - 予約ステータス
    /// * `product_id` - 商品ID
    /// * `availability_id` - 空き枠ID
    /// * `units` - ユニット（ユニットID順）
    pub fn new(
        id: BookingId,
        status: BookingStatus,
        product_id: ProductId,
        availability_id: AvailabilityId,
        units: Vec<Unit>,
    ) -> Self {
        Self {
            id,
            status,
            product_id,
            availability_id,
            units,
        }
    }

    pub fn id(&self) -> BookingId {
        self.id
    }

    pub fn status(&self) -> BookingStatus {
        self.status
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn availability_id(&self) -> AvailabilityId {
        self.availability_id
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// 予約が確定済みかどうか
    pub fn is_confirmed(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }
}

/// 予約
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum Booking {
    Base(BookingBase),
    WithPrice(Priced<BookingBase>),
}

impl CapabilityView for Booking {
    type Base = BookingBase;

    fn base(&self) -> &BookingBase {
        match self {
            Booking::Base(base) => base,
            Booking::WithPrice(priced) => priced.base(),
        }
    }

    fn price(&self) -> Option<&Price> {
        match self {
            Booking::Base(_) => None,
            Booking::WithPrice(priced) => Some(priced.price()),
        }
    }
}

/// 予約作成リクエスト
/// 呼び出し元のユーザーは認証済みのIDとして明示的に渡す
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateBookingRequest {
    pub product_id: ProductId,
    pub availability_id: AvailabilityId,
    pub units: u32,
    pub user_id: UserId,
}
