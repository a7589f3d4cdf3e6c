use crate::adapter::database_config::ConfigError;
use std::env;
use std::time::Duration;

/// HTTPサーバーの設定
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_address: String,
    pub log_level: String,
    pub request_timeout: Duration,
}

impl ServerConfig {
    /// 環境変数から設定を読み取る
    /// 環境変数が設定されていない場合はデフォルト値を使用
    pub fn from_env() -> Result<Self, ConfigError> {
        let listen_address =
            env::var("LISTEN_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let request_timeout = env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| {
                ConfigError::InvalidValue(format!("Invalid REQUEST_TIMEOUT_SECS: {}", e))
            })?;

        Ok(Self {
            listen_address,
            log_level,
            request_timeout,
        })
    }
}
