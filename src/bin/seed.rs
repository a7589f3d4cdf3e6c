use booking_service::adapter::driven::tracing_logger;
use booking_service::adapter::{
    DatabaseConfig, DatabaseMigration, MySqlSeeder, SeedConfig, ServerConfig,
};
use sqlx::mysql::MySqlPoolOptions;

// 開発用のシードデータを生成する
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let server_config = ServerConfig::from_env()?;
    tracing_logger::init(&server_config.log_level);

    let seed_config = SeedConfig::from_env()?;
    let config = DatabaseConfig::from_env()?;

    let pool = MySqlPoolOptions::new()
        .max_connections(1)
        .connect(&config.connection_string())
        .await?;

    DatabaseMigration::new(pool.clone()).run().await?;

    let users = MySqlSeeder::new(pool).seed(&seed_config).await?;
    for user in &users {
        tracing::info!(
            user_id = %user.id,
            email = %user.email,
            api_key = %user.api_key,
            "user created"
        );
    }

    tracing::info!(
        products = seed_config.products,
        users = seed_config.users,
        availability_days = seed_config.availability_days,
        "data generation completed"
    );
    Ok(())
}
