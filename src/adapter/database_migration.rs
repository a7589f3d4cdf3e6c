use crate::adapter::database_error::DatabaseError;
use sqlx::{MySql, Pool};

/// マイグレーション（ファイル名とSQL）
/// 依存関係の順に並べる
const MIGRATIONS: [(&str, &str); 6] = [
    (
        "001_create_users_table",
        include_str!("../../migrations/001_create_users_table.sql"),
    ),
    (
        "002_create_products_table",
        include_str!("../../migrations/002_create_products_table.sql"),
    ),
    (
        "003_create_prices_table",
        include_str!("../../migrations/003_create_prices_table.sql"),
    ),
    (
        "004_create_availabilities_table",
        include_str!("../../migrations/004_create_availabilities_table.sql"),
    ),
    (
        "005_create_bookings_table",
        include_str!("../../migrations/005_create_bookings_table.sql"),
    ),
    (
        "006_create_units_table",
        include_str!("../../migrations/006_create_units_table.sql"),
    ),
];

/// データベースマイグレーションを管理する構造体
pub struct DatabaseMigration {
    pool: Pool<MySql>,
}

impl DatabaseMigration {
    /// 新しいDatabaseMigrationインスタンスを作成
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    /// マイグレーションを実行
    /// べき等性を保証（CREATE TABLE IF NOT EXISTS）
    pub async fn run(&self) -> Result<(), DatabaseError> {
        for (name, migration_sql) in MIGRATIONS {
            tracing::debug!(migration = name, "running migration");
            sqlx::query(migration_sql)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    DatabaseError::MigrationError(format!("Migration {} failed: {}", name, e))
                })?;
        }

        tracing::info!(count = MIGRATIONS.len(), "all migrations completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent_statements() {
        for (name, sql) in MIGRATIONS {
            assert!(
                sql.contains("CREATE TABLE IF NOT EXISTS"),
                "{} must be idempotent",
                name
            );
        }
    }

    #[test]
    fn test_migrations_are_ordered() {
        let names: Vec<&str> = MIGRATIONS.iter().map(|(name, _)| *name).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }
}
