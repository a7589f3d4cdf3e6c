use crate::adapter::database_error::classify;
use crate::adapter::driven::column;
use crate::domain::model::{
    Availability, AvailabilityBase, AvailabilityId, Capability, Price, Priced, Product,
    ProductBase, ProductId,
};
use crate::domain::port::{HealthCheck, ProductRepository, RepositoryError};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, Pool};

const PRODUCT_COLUMNS: &str = "p.id, p.name, p.capacity";
const AVAILABILITY_COLUMNS: &str = "a.id, a.local_date, a.vacancies";
const PRICE_COLUMNS: &str = ", pr.price, pr.currency";
const PRICE_JOIN: &str = "JOIN prices pr ON pr.product_id = p.id";

/// MySQL商品リポジトリ
/// 商品と空き枠の読み取りを提供する
pub struct MySqlProductRepository {
    pool: Pool<MySql>,
}

impl MySqlProductRepository {
    /// 新しいMySQL商品リポジトリを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    // 価格ケイパビリティの場合だけ価格テーブルを結合する
    fn price_parts(capability: Capability) -> (&'static str, &'static str) {
        match capability {
            Capability::None => ("", ""),
            Capability::Price => (PRICE_COLUMNS, PRICE_JOIN),
        }
    }

    fn price_from_row(row: &MySqlRow) -> Result<Price, RepositoryError> {
        let price: i32 = column(row, "price")?;
        let currency: String = column(row, "currency")?;
        Ok(Price::new(i64::from(price), currency))
    }

    fn product_from_row(row: &MySqlRow, capability: Capability) -> Result<Product, RepositoryError> {
        let base = ProductBase::new(
            ProductId::new(column(row, "id")?),
            column::<String>(row, "name")?,
            column(row, "capacity")?,
        );
        Ok(match capability {
            Capability::None => Product::Base(base),
            Capability::Price => Product::WithPrice(Priced::new(base, Self::price_from_row(row)?)),
        })
    }

    fn availability_from_row(
        row: &MySqlRow,
        capability: Capability,
    ) -> Result<Availability, RepositoryError> {
        let base = AvailabilityBase::new(
            AvailabilityId::new(column(row, "id")?),
            column(row, "local_date")?,
            column(row, "vacancies")?,
        );
        Ok(match capability {
            Capability::None => Availability::Base(base),
            Capability::Price => {
                Availability::WithPrice(Priced::new(base, Self::price_from_row(row)?))
            }
        })
    }
}

#[async_trait]
impl ProductRepository for MySqlProductRepository {
    async fn find_all(&self, capability: Capability) -> Result<Vec<Product>, RepositoryError> {
        let (price_columns, price_join) = Self::price_parts(capability);
        let sql = format!(
            "SELECT {}{} FROM products p {} WHERE p.deleted_at IS NULL ORDER BY p.id",
            PRODUCT_COLUMNS, price_columns, price_join
        );

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| classify("商品一覧の取得に失敗しました", e))
            .map_err(RepositoryError::from)?;

        rows.iter()
            .map(|row| Self::product_from_row(row, capability))
            .collect()
    }

    async fn find_by_id(
        &self,
        id: ProductId,
        capability: Capability,
    ) -> Result<Product, RepositoryError> {
        let (price_columns, price_join) = Self::price_parts(capability);
        let sql = format!(
            "SELECT {}{} FROM products p {} WHERE p.id = ? AND p.deleted_at IS NULL",
            PRODUCT_COLUMNS, price_columns, price_join
        );

        let row = sqlx::query(&sql)
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| classify("商品の取得に失敗しました", e))
            .map_err(RepositoryError::from)?
            .ok_or(RepositoryError::NotFound)?;

        Self::product_from_row(&row, capability)
    }

    async fn find_availability(
        &self,
        product_id: ProductId,
        local_date: NaiveDate,
        capability: Capability,
    ) -> Result<Availability, RepositoryError> {
        let (price_columns, price_join) = Self::price_parts(capability);
        let sql = format!(
            "SELECT {}{} FROM availabilities a JOIN products p ON p.id = a.product_id {} \
             WHERE a.product_id = ? AND a.local_date = ?",
            AVAILABILITY_COLUMNS, price_columns, price_join
        );

        let row = sqlx::query(&sql)
            .bind(product_id.value())
            .bind(local_date)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| classify("空き枠の取得に失敗しました", e))
            .map_err(RepositoryError::from)?
            .ok_or(RepositoryError::NotFound)?;

        Self::availability_from_row(&row, capability)
    }

    async fn find_availabilities(
        &self,
        product_id: ProductId,
        local_date_start: NaiveDate,
        local_date_end: NaiveDate,
        capability: Capability,
    ) -> Result<Vec<Availability>, RepositoryError> {
        let (price_columns, price_join) = Self::price_parts(capability);
        let sql = format!(
            "SELECT {}{} FROM availabilities a JOIN products p ON p.id = a.product_id {} \
             WHERE a.product_id = ? AND a.local_date BETWEEN ? AND ? ORDER BY a.local_date",
            AVAILABILITY_COLUMNS, price_columns, price_join
        );

        let rows = sqlx::query(&sql)
            .bind(product_id.value())
            .bind(local_date_start)
            .bind(local_date_end)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| classify("空き枠一覧の取得に失敗しました", e))
            .map_err(RepositoryError::from)?;

        rows.iter()
            .map(|row| Self::availability_from_row(row, capability))
            .collect()
    }
}

#[async_trait]
impl HealthCheck for MySqlProductRepository {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| classify("データベースの疎通確認に失敗しました", e))
            .map_err(RepositoryError::from)?;
        Ok(())
    }
}
