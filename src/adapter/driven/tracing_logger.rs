use crate::domain::port::Logger;
use std::collections::HashMap;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// tracingを使ったログ実装
/// コンポーネント・相関ID・追加コンテキストを構造化フィールドとして出力する
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn new() -> Self {
        Self
    }
}

/// 追加コンテキストを `key=value` 形式に整形する
/// 出力を安定させるためキーの昇順で並べる
fn format_context(context: Option<HashMap<String, String>>) -> String {
    let Some(context) = context else {
        return String::new();
    };
    let mut pairs: Vec<(String, String)> = context.into_iter().collect();
    pairs.sort();
    pairs
        .into_iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_correlation_id(correlation_id: Option<Uuid>) -> String {
    correlation_id.map(|id| id.to_string()).unwrap_or_default()
}

impl Logger for TracingLogger {
    fn debug(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    ) {
        tracing::debug!(
            component,
            correlation_id = %format_correlation_id(correlation_id),
            context = %format_context(context),
            "{}",
            message
        );
    }

    fn info(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    ) {
        tracing::info!(
            component,
            correlation_id = %format_correlation_id(correlation_id),
            context = %format_context(context),
            "{}",
            message
        );
    }

    fn warn(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    ) {
        tracing::warn!(
            component,
            correlation_id = %format_correlation_id(correlation_id),
            context = %format_context(context),
            "{}",
            message
        );
    }

    fn error(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    ) {
        tracing::error!(
            component,
            correlation_id = %format_correlation_id(correlation_id),
            context = %format_context(context),
            "{}",
            message
        );
    }
}

/// グローバルなtracingサブスクライバーを初期化する
/// `RUST_LOG` が設定されている場合はそちらを優先し、なければ `level` を使う
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // 二重初期化（テストなど）は無視する
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
