use crate::adapter::database_config::ConfigError;
use crate::adapter::database_error::{classify, DatabaseError};
use crate::domain::model::{AvailabilityId, ProductId, UserId};
use chrono::{Days, NaiveDate};
use fake::faker::company::en::CatchPhrase;
use fake::faker::currency::en::CurrencyCode;
use fake::faker::internet::en::SafeEmail;
use fake::Fake;
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use sqlx::mysql::MySqlConnection;
use sqlx::{MySql, Pool, Row};
use std::env;

const API_KEY_LENGTH: usize = 32;

/// シードデータ生成の設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedConfig {
    pub products: u32,
    pub users: u32,
    pub availability_days: u32,
}

impl SeedConfig {
    /// 環境変数から設定を読み取る
    /// 環境変数が設定されていない場合はデフォルト値を使用
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            products: parse_env("SEED_PRODUCTS", 10)?,
            users: parse_env("SEED_USERS", 2)?,
            availability_days: parse_env("SEED_AVAILABILITY_DAYS", 365)?,
        })
    }
}

fn parse_env(name: &str, default: u32) -> Result<u32, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .parse::<u32>()
            .map_err(|e| ConfigError::InvalidValue(format!("Invalid {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

/// 生成されたユーザー
#[derive(Debug, Clone)]
pub struct SeededUser {
    pub id: UserId,
    pub email: String,
    pub api_key: String,
}

/// `[low, high]` の範囲の乱数
fn random_in(low: i32, high: i32) -> i32 {
    thread_rng().gen_range(low..=high)
}

/// 新しいAPIキーを生成する（英数字32文字）
pub fn generate_api_key() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(API_KEY_LENGTH)
        .map(char::from)
        .collect()
}

/// シードデータを投入する
/// 開発用データの生成と、MySQLを使うテストの準備に使う
pub struct MySqlSeeder {
    pool: Pool<MySql>,
}

impl MySqlSeeder {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    /// 設定に従って商品・価格・空き枠・ユーザーを一つのトランザクションで生成する
    ///
    /// # Returns
    /// * `Ok(Vec<SeededUser>)` - 生成されたユーザー（APIキー付き）
    pub async fn seed(&self, config: &SeedConfig) -> Result<Vec<SeededUser>, DatabaseError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| classify("トランザクション開始に失敗しました", e))?;

        let today = chrono::Local::now().date_naive();
        for _ in 0..config.products {
            let name: String = CatchPhrase().fake();
            let currency: String = CurrencyCode().fake();
            let product_id = insert_product(&mut *tx, &name, random_in(1, 1000)).await?;
            insert_price(&mut *tx, product_id, random_in(10, 1000), &currency).await?;

            for day in 0..config.availability_days {
                let local_date = today
                    .checked_add_days(Days::new(u64::from(day)))
                    .ok_or_else(|| {
                        DatabaseError::QueryError(format!("日付の計算に失敗しました: {}", day))
                    })?;
                insert_availability(&mut *tx, product_id, local_date, random_in(1, 1000)).await?;
            }
            tracing::debug!(product_id = %product_id, name = %name, "product seeded");
        }

        let mut users = Vec::new();
        for _ in 0..config.users {
            let api_key = generate_api_key();
            let email: String = SafeEmail().fake();
            let id = insert_user(&mut *tx, &email, &api_key).await?;
            users.push(SeededUser { id, email, api_key });
        }

        tx.commit()
            .await
            .map_err(|e| classify("トランザクションのコミットに失敗しました", e))?;

        Ok(users)
    }

    pub async fn insert_user(&self, email: &str, api_key: &str) -> Result<UserId, DatabaseError> {
        let mut conn = self.connection().await?;
        insert_user(&mut *conn, email, api_key).await
    }

    pub async fn insert_product(&self, name: &str, capacity: i32) -> Result<ProductId, DatabaseError> {
        let mut conn = self.connection().await?;
        insert_product(&mut *conn, name, capacity).await
    }

    pub async fn insert_price(
        &self,
        product_id: ProductId,
        price: i32,
        currency: &str,
    ) -> Result<(), DatabaseError> {
        let mut conn = self.connection().await?;
        insert_price(&mut *conn, product_id, price, currency).await
    }

    pub async fn insert_availability(
        &self,
        product_id: ProductId,
        local_date: NaiveDate,
        vacancies: i32,
    ) -> Result<AvailabilityId, DatabaseError> {
        let mut conn = self.connection().await?;
        insert_availability(&mut *conn, product_id, local_date, vacancies).await
    }

    /// 商品を論理削除する
    pub async fn soft_delete_product(&self, product_id: ProductId) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE products SET deleted_at = CURRENT_TIMESTAMP WHERE id = ?")
            .bind(product_id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| classify("商品の削除に失敗しました", e))?;
        Ok(())
    }

    /// 空き枠の現在の空き数
    pub async fn vacancies(&self, availability_id: AvailabilityId) -> Result<i32, DatabaseError> {
        let row = sqlx::query("SELECT vacancies FROM availabilities WHERE id = ?")
            .bind(availability_id.value())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| classify("空き数の取得に失敗しました", e))?;
        row.try_get("vacancies")
            .map_err(|e| DatabaseError::QueryError(format!("空き数の読み取りに失敗しました: {}", e)))
    }

    async fn connection(&self) -> Result<sqlx::pool::PoolConnection<MySql>, DatabaseError> {
        self.pool
            .acquire()
            .await
            .map_err(|e| DatabaseError::ConnectionError(format!("接続の取得に失敗しました: {}", e)))
    }
}

fn inserted_id(result: sqlx::mysql::MySqlQueryResult) -> Result<i64, DatabaseError> {
    i64::try_from(result.last_insert_id())
        .map_err(|e| DatabaseError::QueryError(format!("IDの変換に失敗しました: {}", e)))
}

async fn insert_user(
    conn: &mut MySqlConnection,
    email: &str,
    api_key: &str,
) -> Result<UserId, DatabaseError> {
    let result = sqlx::query("INSERT INTO users (email, api_key) VALUES (?, ?)")
        .bind(email)
        .bind(api_key)
        .execute(conn)
        .await
        .map_err(|e| classify("ユーザーの保存に失敗しました", e))?;
    Ok(UserId::new(inserted_id(result)?))
}

async fn insert_product(
    conn: &mut MySqlConnection,
    name: &str,
    capacity: i32,
) -> Result<ProductId, DatabaseError> {
    let result = sqlx::query("INSERT INTO products (name, capacity) VALUES (?, ?)")
        .bind(name)
        .bind(capacity)
        .execute(conn)
        .await
        .map_err(|e| classify("商品の保存に失敗しました", e))?;
    Ok(ProductId::new(inserted_id(result)?))
}

async fn insert_price(
    conn: &mut MySqlConnection,
    product_id: ProductId,
    price: i32,
    currency: &str,
) -> Result<(), DatabaseError> {
    sqlx::query("INSERT INTO prices (product_id, price, currency) VALUES (?, ?, ?)")
        .bind(product_id.value())
        .bind(price)
        .bind(currency)
        .execute(conn)
        .await
        .map_err(|e| classify("価格の保存に失敗しました", e))?;
    Ok(())
}

async fn insert_availability(
    conn: &mut MySqlConnection,
    product_id: ProductId,
    local_date: NaiveDate,
    vacancies: i32,
) -> Result<AvailabilityId, DatabaseError> {
    let result = sqlx::query(
        "INSERT INTO availabilities (product_id, local_date, vacancies) VALUES (?, ?, ?)",
    )
    .bind(product_id.value())
    .bind(local_date)
    .bind(vacancies)
    .execute(conn)
    .await
    .map_err(|e| classify("空き枠の保存に失敗しました", e))?;
    Ok(AvailabilityId::new(inserted_id(result)?))
}
