use booking_service::adapter::driven::{
    tracing_logger, MySqlBookingRepository, MySqlProductRepository, MySqlUserRepository,
    TracingLogger,
};
use booking_service::adapter::driver::{create_router, AppState};
use booking_service::adapter::{DatabaseConfig, DatabaseMigration, ServerConfig};
use booking_service::application::service::{BookingApplicationService, ProductQueryService};
use booking_service::domain::port::Logger;

use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .envファイルから環境変数を読み込む
    dotenvy::dotenv().ok();

    let server_config = ServerConfig::from_env()?;
    tracing_logger::init(&server_config.log_level);

    // データベース設定を読み込む
    let config = DatabaseConfig::from_env()?;

    // 接続プールを作成
    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.connection_string())
        .await?;
    tracing::info!(max_connections = config.max_connections, "database pool created");

    // マイグレーションを実行
    DatabaseMigration::new(pool.clone()).run().await?;

    // リポジトリとサービスを作成
    let logger: Arc<dyn Logger> = Arc::new(TracingLogger::new());
    let product_repository = Arc::new(MySqlProductRepository::new(pool.clone()));
    let booking_repository = Arc::new(MySqlBookingRepository::new(pool.clone()));
    let user_repository = Arc::new(MySqlUserRepository::new(pool.clone()));

    let app_state = AppState {
        booking_service: Arc::new(BookingApplicationService::new(
            booking_repository,
            logger.clone(),
        )),
        product_query_service: Arc::new(ProductQueryService::new(product_repository.clone())),
        user_repository,
        health_check: product_repository,
        logger,
    };

    let app = create_router(app_state).layer(
        ServiceBuilder::new()
            .layer(CorsLayer::permissive())
            .layer(TimeoutLayer::new(server_config.request_timeout)),
    );

    // サーバーを起動
    let listener = tokio::net::TcpListener::bind(&server_config.listen_address).await?;
    tracing::info!(address = %server_config.listen_address, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

// Ctrl+C または SIGTERM を待つ
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
