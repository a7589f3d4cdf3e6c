use crate::adapter::database_error::{classify, DatabaseError};
use crate::adapter::driven::booking_projection::{project_bookings, BookingRow};
use crate::adapter::driven::column;
use crate::domain::model::{
    Booking, BookingId, BookingStatus, Capability, CreateBookingRequest, Price, Ticket, UserId,
};
use crate::domain::port::{BookingRepository, RepositoryError};
use async_trait::async_trait;
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, Pool};

/// MySQL予約リポジトリ
/// 空き数の更新と予約の作成・確定をトランザクション内で行う
pub struct MySqlBookingRepository {
    pool: Pool<MySql>,
}

impl MySqlBookingRepository {
    /// 新しいMySQL予約リポジトリを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    fn booking_row(row: &MySqlRow, capability: Capability) -> Result<BookingRow, RepositoryError> {
        let price = match capability {
            Capability::None => None,
            Capability::Price => {
                let price: i32 = column(row, "price")?;
                let currency: String = column(row, "currency")?;
                Some(Price::new(i64::from(price), currency))
            }
        };

        Ok(BookingRow {
            booking_id: column(row, "booking_id")?,
            product_id: column(row, "product_id")?,
            availability_id: column(row, "availability_id")?,
            status: column(row, "status")?,
            unit_id: column(row, "unit_id")?,
            ticket: column(row, "ticket")?,
            price,
        })
    }
}

#[async_trait]
impl BookingRepository for MySqlBookingRepository {
    async fn create(&self, request: &CreateBookingRequest) -> Result<BookingId, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| {
                DatabaseError::ConnectionError(format!("トランザクション開始に失敗しました: {}", e))
            })
            .map_err(RepositoryError::from)?;

        let units = i64::from(request.units);

        // 空き数の確認と減算を一つの条件付き更新で行う
        // 行ロックはコミットまで保持される
        let updated = sqlx::query(
            r#"
            UPDATE availabilities
            SET vacancies = vacancies - ?
            WHERE id = ? AND product_id = ? AND vacancies >= ?
            "#,
        )
        .bind(units)
        .bind(request.availability_id.value())
        .bind(request.product_id.value())
        .bind(units)
        .execute(&mut *tx)
        .await
        .map_err(|e| classify("空き数の更新に失敗しました", e))
        .map_err(RepositoryError::from)?;

        if updated.rows_affected() == 0 {
            // txはドロップ時にロールバックされる
            return Err(RepositoryError::NotAvailable);
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO bookings (product_id, availability_id, user_id, status)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(request.product_id.value())
        .bind(request.availability_id.value())
        .bind(request.user_id.value())
        .bind(BookingStatus::Reserved.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| classify("予約の保存に失敗しました", e))
        .map_err(RepositoryError::from)?;

        let booking_id = i64::try_from(inserted.last_insert_id()).map_err(|e| {
            RepositoryError::OperationFailed(format!("予約IDの変換に失敗しました: {}", e))
        })?;

        for _ in 0..request.units {
            sqlx::query("INSERT INTO units (booking_id) VALUES (?)")
                .bind(booking_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| classify("ユニットの保存に失敗しました", e))
                .map_err(RepositoryError::from)?;
        }

        tx.commit()
            .await
            .map_err(|e| classify("トランザクションのコミットに失敗しました", e))
            .map_err(RepositoryError::from)?;

        Ok(BookingId::new(booking_id))
    }

    async fn confirm(&self, id: BookingId, user_id: UserId) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| {
                DatabaseError::ConnectionError(format!("トランザクション開始に失敗しました: {}", e))
            })
            .map_err(RepositoryError::from)?;

        // 同じ予約への確定は行ロックで直列化される
        let rows = sqlx::query(
            r#"
            SELECT b.status, u.id AS unit_id
            FROM bookings b
            JOIN units u ON u.booking_id = b.id
            WHERE b.id = ? AND b.user_id = ?
            ORDER BY u.id
            FOR UPDATE
            "#,
        )
        .bind(id.value())
        .bind(user_id.value())
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| classify("確定対象の予約の取得に失敗しました", e))
        .map_err(RepositoryError::from)?;

        let first = rows.first().ok_or(RepositoryError::NotFound)?;
        let status: String = column(first, "status")?;
        let status = BookingStatus::from_string(&status).map_err(|e| {
            RepositoryError::FetchFailed(format!("予約ステータスの解析に失敗しました: {}", e))
        })?;

        if status == BookingStatus::Confirmed {
            tx.commit()
                .await
                .map_err(|e| classify("トランザクションのコミットに失敗しました", e))
                .map_err(RepositoryError::from)?;
            return Ok(());
        }

        sqlx::query("UPDATE bookings SET status = ? WHERE id = ?")
            .bind(BookingStatus::Confirmed.as_str())
            .bind(id.value())
            .execute(&mut *tx)
            .await
            .map_err(|e| classify("予約ステータスの更新に失敗しました", e))
            .map_err(RepositoryError::from)?;

        for row in &rows {
            let unit_id: i64 = column(row, "unit_id")?;
            sqlx::query("UPDATE units SET ticket = ? WHERE id = ?")
                .bind(Ticket::generate().to_string())
                .bind(unit_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| classify("チケットの発行に失敗しました", e))
                .map_err(RepositoryError::from)?;
        }

        tx.commit()
            .await
            .map_err(|e| classify("トランザクションのコミットに失敗しました", e))
            .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        id: BookingId,
        user_id: UserId,
        capability: Capability,
    ) -> Result<Booking, RepositoryError> {
        let (price_columns, price_join) = match capability {
            Capability::None => ("", ""),
            Capability::Price => (
                ", pr.price, pr.currency",
                "JOIN prices pr ON pr.product_id = b.product_id",
            ),
        };
        let sql = format!(
            "SELECT b.id AS booking_id, b.product_id, b.availability_id, b.status, \
             u.id AS unit_id, u.ticket{} \
             FROM bookings b JOIN units u ON u.booking_id = b.id {} \
             WHERE b.id = ? AND b.user_id = ? ORDER BY u.id",
            price_columns, price_join
        );

        let rows = sqlx::query(&sql)
            .bind(id.value())
            .bind(user_id.value())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| classify("予約の取得に失敗しました", e))
            .map_err(RepositoryError::from)?;

        let rows = rows
            .iter()
            .map(|row| Self::booking_row(row, capability))
            .collect::<Result<Vec<_>, _>>()?;

        project_bookings(rows, capability)?
            .into_iter()
            .next()
            .ok_or(RepositoryError::NotFound)
    }
}
