use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::domain::model::User;
use crate::domain::port::Logger;

const COMPONENT: &str = "HttpRequest";

/// リクエストごとに一件のログを出力するミドルウェア
/// 相関ID・メソッド・パス・ステータス・処理時間と、認証済みであればユーザーIDを記録する
pub async fn log_requests(
    State(logger): State<Arc<dyn Logger>>,
    request: Request,
    next: Next,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let started = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    let mut context = HashMap::new();
    context.insert("method".to_string(), method);
    context.insert("path".to_string(), path);
    context.insert("status".to_string(), response.status().as_u16().to_string());
    context.insert(
        "duration_ms".to_string(),
        started.elapsed().as_millis().to_string(),
    );
    if let Some(user) = response.extensions().get::<User>() {
        context.insert("user_id".to_string(), user.id().to_string());
    }

    logger.info(COMPONENT, "request handled", Some(correlation_id), Some(context));
    response
}
