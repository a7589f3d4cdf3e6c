use crate::adapter::database_error::classify;
use crate::adapter::driven::column;
use crate::domain::model::{User, UserId};
use crate::domain::port::{RepositoryError, UserRepository};
use async_trait::async_trait;
use sqlx::{MySql, Pool};

/// MySQLユーザーリポジトリ
pub struct MySqlUserRepository {
    pool: Pool<MySql>,
}

impl MySqlUserRepository {
    /// 新しいMySQLユーザーリポジトリを作成
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_api_key(&self, api_key: &str) -> Result<User, RepositoryError> {
        let row = sqlx::query("SELECT id, email FROM users WHERE api_key = ?")
            .bind(api_key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| classify("ユーザーの取得に失敗しました", e))
            .map_err(RepositoryError::from)?
            .ok_or(RepositoryError::NotFound)?;

        Ok(User::new(
            UserId::new(column(&row, "id")?),
            column::<String>(&row, "email")?,
        ))
    }
}
