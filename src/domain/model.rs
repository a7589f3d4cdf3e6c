// ドメインモデル（読み取りモデルと値オブジェクト）
// 各エンティティは追加情報なし／価格付きの二通りの表現を持つ

mod availability;
mod booking;
mod capability;
mod product;
mod user;
mod value_objects;

pub use value_objects::{
    AvailabilityId, BookingId, ProductId, UnitId, UserId,
    AvailabilityStatus, BookingStatus,
    Ticket,
};

pub use availability::{Availability, AvailabilityBase};
pub use booking::{Booking, BookingBase, CreateBookingRequest, Unit, UnitBase};
pub use capability::{Capability, CapabilityView, Price, Priced};
pub use product::{Product, ProductBase};
pub use user::User;
