// APIドキュメント（OpenAPI / Swagger UI）

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::adapter::driver::request_dto::{AvailabilityRequest, BookingRequest};
use crate::adapter::driver::response_dto::{ApiError, HealthResponse};

pub const SWAGGER_UI_PATH: &str = "/docs";
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";
pub const OPENAPI_YAML_PATH: &str = "/api-docs/openapi.yaml";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Booking Service API",
        version = "1.0.0",
        description = "商品・空き枠の照会と予約の作成・確定を行うAPI。`X-API-Key` ヘッダーで認証する。"
    ),
    tags(
        (name = "Products", description = "商品と空き枠"),
        (name = "Bookings", description = "予約の作成・確定・照会"),
        (name = "Health", description = "死活監視")
    ),
    paths(
        super::rest_api::health_check,
        super::rest_api::get_products,
        super::rest_api::get_product,
        super::rest_api::get_availability,
        super::rest_api::create_booking,
        super::rest_api::confirm_booking,
        super::rest_api::get_booking,
    ),
    components(schemas(ApiError, HealthResponse, AvailabilityRequest, BookingRequest)),
    modifiers(&ApiKeySecurity)
)]
pub struct ApiDoc;

/// `X-API-Key` ヘッダーによる認証スキームを登録する
struct ApiKeySecurity;

impl Modify for ApiKeySecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-API-Key"))),
            );
        }
    }
}

/// 認証なしで公開するドキュメント用のルーター
pub fn docs_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .merge(SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_JSON_PATH, ApiDoc::openapi()))
        .route(OPENAPI_YAML_PATH, get(openapi_yaml))
}

async fn openapi_yaml() -> Response {
    match ApiDoc::openapi().to_yaml() {
        Ok(yaml) => ([(header::CONTENT_TYPE, "application/yaml")], yaml).into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::new(
                "INTERNAL_ERROR",
                format!("failed to render openapi document: {}", err),
            )),
        )
            .into_response(),
    }
}
