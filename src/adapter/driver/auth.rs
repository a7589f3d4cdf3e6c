use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};

use std::collections::HashMap;

use crate::adapter::driver::response_dto::ApiError;
use crate::adapter::driver::rest_api::AppState;
use crate::domain::port::RepositoryError;

const COMPONENT: &str = "Auth";

/// APIキーを渡すヘッダー
pub const API_KEY_HEADER: &str = "x-api-key";

/// APIキーからユーザーを特定し、リクエストの拡張に格納する認証ミドルウェア
/// リクエストログから参照できるよう、レスポンスの拡張にもユーザーを格納する
pub async fn require_user(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let api_key = match request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
    {
        Some(api_key) => api_key.to_string(),
        None => return unauthorized("missing API key"),
    };

    let user = match state.user_repository.find_by_api_key(&api_key).await {
        Ok(user) => user,
        Err(RepositoryError::NotFound) => return unauthorized("invalid API key"),
        Err(err) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(
                    ApiError::new("REPOSITORY_ERROR", "failed to authenticate")
                        .with_detail(err.to_string()),
                ),
            )
                .into_response()
        }
    };

    let mut context = HashMap::new();
    context.insert("user_id".to_string(), user.id().to_string());
    context.insert("email".to_string(), user.email().to_string());
    state
        .logger
        .debug(COMPONENT, "request authenticated", None, Some(context));

    request.extensions_mut().insert(user.clone());
    let mut response = next.run(request).await;
    response.extensions_mut().insert(user);
    response
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiError::new("UNAUTHORIZED", message)),
    )
        .into_response()
}
