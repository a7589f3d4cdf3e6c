use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use std::collections::HashMap;
use std::sync::Arc;

use crate::adapter::driver::auth;
use crate::adapter::driver::openapi;
use crate::adapter::driver::request_dto::{
    AvailabilityQuery, AvailabilityRequest, BookingRequest, CapabilityHeader,
};
use crate::adapter::driver::request_logging;
use crate::adapter::driver::response_dto::{ApiError, HealthResponse};
use crate::application::service::{BookingApplicationService, ProductQueryService};
use crate::application::ApplicationError;
use crate::domain::error::DomainError;
use crate::domain::model::{
    Availability, Booking, BookingId, Capability, CreateBookingRequest, Product, ProductId, User,
    UserId,
};
use crate::domain::port::{HealthCheck, Logger, UserRepository};

const COMPONENT: &str = "RestApi";

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

// アプリケーションサービスを含む状態
#[derive(Clone)]
pub struct AppState {
    pub booking_service: Arc<BookingApplicationService>,
    pub product_query_service: Arc<ProductQueryService>,
    pub user_repository: Arc<dyn UserRepository>,
    pub health_check: Arc<dyn HealthCheck>,
    pub logger: Arc<dyn Logger>,
}

impl AppState {
    // 500系のエラーは詳細をログに残してから返す
    fn error_response(&self, err: ApplicationError) -> (StatusCode, Json<ApiError>) {
        if let ApplicationError::RepositoryError { operation, source } = &err {
            let mut context = HashMap::new();
            context.insert("operation".to_string(), operation.to_string());
            context.insert("error".to_string(), source.to_string());
            self.logger
                .error(COMPONENT, "request failed", None, Some(context));
        }
        map_application_error(err)
    }
}

// REST APIルーターを作成
// ヘルスチェック以外は認証が必要
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/products", get(get_products))
        .route("/products/:id", get(get_product))
        .route("/availability", post(get_availability))
        .route("/bookings", post(create_booking))
        .route("/bookings/:id", get(get_booking))
        .route("/bookings/:id/confirm", post(confirm_booking))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_user,
        ));

    Router::new()
        .route("/-/health", get(health_check))
        .merge(protected)
        .merge(openapi::docs_router())
        .layer(middleware::from_fn_with_state(
            state.logger.clone(),
            request_logging::log_requests,
        ))
        .with_state(state)
}

// ヘルスチェックエンドポイント
#[utoipa::path(
    get,
    path = "/-/health",
    responses(
        (status = 200, description = "Datastore reachable", body = HealthResponse),
        (status = 500, description = "Datastore unreachable", body = ApiError)
    ),
    tag = "Health"
)]
pub(crate) async fn health_check(State(state): State<AppState>) -> ApiResult<HealthResponse> {
    match state.health_check.ping().await {
        Ok(()) => Ok(Json(HealthResponse::ok())),
        Err(err) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::new("REPOSITORY_ERROR", "health check failed").with_detail(err.to_string())),
        )),
    }
}

// 商品一覧取得エンドポイント
#[utoipa::path(
    get,
    path = "/products",
    params(("capability" = Option<String>, Header, description = "`price` を指定すると価格を付加する")),
    responses(
        (status = 200, description = "Products ordered by id", body = [Product]),
        (status = 401, description = "Missing or unknown API key", body = ApiError)
    ),
    security(("api_key" = [])),
    tag = "Products"
)]
pub(crate) async fn get_products(
    State(state): State<AppState>,
    CapabilityHeader(capability): CapabilityHeader,
) -> ApiResult<Vec<Product>> {
    state
        .product_query_service
        .get_products(capability)
        .await
        .map(Json)
        .map_err(|err| state.error_response(err))
}

// 商品取得エンドポイント
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(
        ("id" = String, Path, description = "Product id"),
        ("capability" = Option<String>, Header, description = "`price` を指定すると価格を付加する")
    ),
    responses(
        (status = 200, description = "Product", body = Product),
        (status = 400, description = "Invalid product id", body = ApiError),
        (status = 404, description = "Product not found", body = ApiError)
    ),
    security(("api_key" = [])),
    tag = "Products"
)]
pub(crate) async fn get_product(
    State(state): State<AppState>,
    CapabilityHeader(capability): CapabilityHeader,
    Path(id): Path<String>,
) -> ApiResult<Product> {
    let id = ProductId::from_string(&id).map_err(|e| invalid_id("invalid product ID", e))?;

    state
        .product_query_service
        .get_product(id, capability)
        .await
        .map(Json)
        .map_err(|err| state.error_response(err))
}

// 空き枠照会エンドポイント
// 単日照会で該当がない場合は空のリストを返す
#[utoipa::path(
    post,
    path = "/availability",
    params(("capability" = Option<String>, Header, description = "`price` を指定すると価格を付加する")),
    request_body = AvailabilityRequest,
    responses(
        (status = 200, description = "Availabilities; empty when a single date has none", body = [Availability]),
        (status = 400, description = "Malformed request", body = ApiError)
    ),
    security(("api_key" = [])),
    tag = "Products"
)]
pub(crate) async fn get_availability(
    State(state): State<AppState>,
    CapabilityHeader(capability): CapabilityHeader,
    body: Result<Json<AvailabilityRequest>, JsonRejection>,
) -> ApiResult<Vec<Availability>> {
    let Json(request) = body.map_err(|e| invalid_request("failed to decode availability request", e))?;
    let query = request
        .into_query()
        .map_err(|err| map_application_error(err.into()))?;

    match query {
        AvailabilityQuery::Single {
            product_id,
            local_date,
        } => match state
            .product_query_service
            .get_availability(product_id, local_date, capability)
            .await
        {
            Ok(availability) => Ok(Json(vec![availability])),
            Err(err) if err.is_not_found() => Ok(Json(Vec::new())),
            Err(err) => Err(state.error_response(err)),
        },
        AvailabilityQuery::Range {
            product_id,
            local_date_start,
            local_date_end,
        } => state
            .product_query_service
            .get_availabilities(product_id, local_date_start, local_date_end, capability)
            .await
            .map(Json)
            .map_err(|err| state.error_response(err)),
    }
}

// 予約作成エンドポイント
// 作成した予約をリクエストのケイパビリティで読み直して返す
#[utoipa::path(
    post,
    path = "/bookings",
    params(("capability" = Option<String>, Header, description = "`price` を指定すると価格を付加する")),
    request_body = BookingRequest,
    responses(
        (status = 200, description = "Reserved booking", body = Booking),
        (status = 400, description = "Malformed request", body = ApiError),
        (status = 409, description = "Not enough vacancies", body = ApiError)
    ),
    security(("api_key" = [])),
    tag = "Bookings"
)]
pub(crate) async fn create_booking(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    CapabilityHeader(capability): CapabilityHeader,
    body: Result<Json<BookingRequest>, JsonRejection>,
) -> ApiResult<Booking> {
    let Json(request) = body.map_err(|e| invalid_request("failed to decode booking request", e))?;
    request
        .validate()
        .map_err(|err| map_application_error(err.into()))?;

    let booking_id = state
        .booking_service
        .create_booking(CreateBookingRequest {
            product_id: request.product_id,
            availability_id: request.availability_id,
            units: request.units,
            user_id: user.id(),
        })
        .await
        .map_err(|err| state.error_response(err))?;

    read_booking(&state, booking_id, user.id(), capability).await
}

// 予約確定エンドポイント
#[utoipa::path(
    post,
    path = "/bookings/{id}/confirm",
    params(
        ("id" = String, Path, description = "Booking id"),
        ("capability" = Option<String>, Header, description = "`price` を指定すると価格を付加する")
    ),
    responses(
        (status = 200, description = "Confirmed booking with tickets", body = Booking),
        (status = 400, description = "Invalid booking id", body = ApiError),
        (status = 404, description = "Booking not found", body = ApiError)
    ),
    security(("api_key" = [])),
    tag = "Bookings"
)]
pub(crate) async fn confirm_booking(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    CapabilityHeader(capability): CapabilityHeader,
    Path(id): Path<String>,
) -> ApiResult<Booking> {
    let id = BookingId::from_string(&id).map_err(|e| invalid_id("invalid booking ID", e))?;

    state
        .booking_service
        .confirm_booking(id, user.id())
        .await
        .map_err(|err| state.error_response(err))?;

    read_booking(&state, id, user.id(), capability).await
}

// 予約取得エンドポイント
#[utoipa::path(
    get,
    path = "/bookings/{id}",
    params(
        ("id" = String, Path, description = "Booking id"),
        ("capability" = Option<String>, Header, description = "`price` を指定すると価格を付加する")
    ),
    responses(
        (status = 200, description = "Booking", body = Booking),
        (status = 400, description = "Invalid booking id", body = ApiError),
        (status = 404, description = "Booking not found", body = ApiError)
    ),
    security(("api_key" = [])),
    tag = "Bookings"
)]
pub(crate) async fn get_booking(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    CapabilityHeader(capability): CapabilityHeader,
    Path(id): Path<String>,
) -> ApiResult<Booking> {
    let id = BookingId::from_string(&id).map_err(|e| invalid_id("invalid booking ID", e))?;

    read_booking(&state, id, user.id(), capability).await
}

async fn read_booking(
    state: &AppState,
    id: BookingId,
    user_id: UserId,
    capability: Capability,
) -> ApiResult<Booking> {
    state
        .booking_service
        .get_booking(id, user_id, capability)
        .await
        .map(Json)
        .map_err(|err| state.error_response(err))
}

fn invalid_id(message: &str, err: impl ToString) -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError::new("INVALID_ID", message).with_detail(err.to_string())),
    )
}

fn invalid_request(message: &str, rejection: JsonRejection) -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError::new("INVALID_REQUEST", message).with_detail(rejection.body_text())),
    )
}

// アプリケーションエラーをHTTPエラーにマッピング
fn map_application_error(err: ApplicationError) -> (StatusCode, Json<ApiError>) {
    match err {
        ApplicationError::DomainError(domain_err) => match domain_err {
            DomainError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                Json(ApiError::new("NOT_FOUND", msg)),
            ),
            DomainError::NotAvailable => (
                StatusCode::CONFLICT,
                Json(ApiError::new("NOT_AVAILABLE", "not available")),
            ),
            DomainError::InvalidValue(msg) => (
                StatusCode::BAD_REQUEST,
                Json(ApiError::new("INVALID_VALUE", msg)),
            ),
        },
        ApplicationError::RepositoryError { operation, source } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(
                ApiError::new("REPOSITORY_ERROR", format!("failed to {}", operation))
                    .with_detail(source.to_string()),
            ),
        ),
    }
}
