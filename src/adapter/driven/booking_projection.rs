use crate::domain::model::{
    AvailabilityId, Booking, BookingBase, BookingId, BookingStatus, Capability, Price, Priced,
    ProductId, Ticket, Unit, UnitBase, UnitId,
};
use crate::domain::port::RepositoryError;
use std::collections::HashMap;

/// 予約とユニットをJOINした結果の一行
/// 価格ケイパビリティの場合のみ `price` が設定される
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRow {
    pub booking_id: i64,
    pub product_id: i64,
    pub availability_id: i64,
    pub status: String,
    pub unit_id: i64,
    pub ticket: Option<String>,
    pub price: Option<Price>,
}

// 組み立て途中の予約
struct PendingBooking {
    base: BookingBase,
    units: Vec<Unit>,
    total: Option<Price>,
}

/// JOINされた行を予約のリストに畳み込む
/// 予約IDが最初に現れた順序を保ち、各行をユニットとして追加する
///
/// # Arguments
/// * `rows` - データストアが返した順序の行
/// * `capability` - 付加する追加情報
///
/// # Returns
/// * `Err(RepositoryError::FetchFailed)` - ステータスが不正、または価格が欠けている
pub fn project_bookings(
    rows: Vec<BookingRow>,
    capability: Capability,
) -> Result<Vec<Booking>, RepositoryError> {
    let mut positions: HashMap<i64, usize> = HashMap::new();
    let mut pending: Vec<PendingBooking> = Vec::new();

    for row in rows {
        let index = match positions.get(&row.booking_id) {
            Some(index) => *index,
            None => {
                let status = BookingStatus::from_string(&row.status).map_err(|e| {
                    RepositoryError::FetchFailed(format!(
                        "予約ステータスの解析に失敗しました: {}",
                        e
                    ))
                })?;
                pending.push(PendingBooking {
                    base: BookingBase::new(
                        BookingId::new(row.booking_id),
                        status,
                        ProductId::new(row.product_id),
                        AvailabilityId::new(row.availability_id),
                        Vec::new(),
                    ),
                    units: Vec::new(),
                    total: None,
                });
                positions.insert(row.booking_id, pending.len() - 1);
                pending.len() - 1
            }
        };

        let booking = &mut pending[index];
        let unit = UnitBase::new(UnitId::new(row.unit_id), row.ticket.map(Ticket::from_string));

        match capability {
            Capability::None => booking.units.push(Unit::Base(unit)),
            Capability::Price => {
                let price = row.price.ok_or_else(|| {
                    RepositoryError::FetchFailed(format!(
                        "予約の価格が見つかりません: {}",
                        row.booking_id
                    ))
                })?;
                booking.total = Some(match &booking.total {
                    Some(total) => total.accumulate(&price),
                    None => price.clone(),
                });
                booking.units.push(Unit::WithPrice(Priced::new(unit, price)));
            }
        }
    }

    Ok(pending
        .into_iter()
        .map(|booking| {
            let base = BookingBase::new(
                booking.base.id(),
                booking.base.status(),
                booking.base.product_id(),
                booking.base.availability_id(),
                booking.units,
            );
            match booking.total {
                Some(total) => Booking::WithPrice(Priced::new(base, total)),
                None => Booking::Base(base),
            }
        })
        .collect())
}
