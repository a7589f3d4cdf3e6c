// 駆動される側アダプター（リポジトリ実装など）

mod booking_projection;
mod booking_repository;
mod product_repository;
pub mod tracing_logger;
mod user_repository;

pub use booking_projection::{project_bookings, BookingRow};
pub use booking_repository::MySqlBookingRepository;
pub use product_repository::MySqlProductRepository;
pub use tracing_logger::TracingLogger;
pub use user_repository::MySqlUserRepository;

use crate::domain::port::RepositoryError;
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, Row};

/// 行から列の値を読み取る
/// 型の不一致などはFetchFailedとして返す
pub(crate) fn column<'r, T>(row: &'r MySqlRow, name: &str) -> Result<T, RepositoryError>
where
    T: sqlx::Decode<'r, MySql> + sqlx::Type<MySql>,
{
    row.try_get(name).map_err(|e| {
        RepositoryError::FetchFailed(format!("列 {} の読み取りに失敗しました: {}", name, e))
    })
}
