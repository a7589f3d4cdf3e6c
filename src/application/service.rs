use crate::application::ApplicationError;
use crate::domain::error::DomainError;
use crate::domain::model::{Booking, BookingId, Capability, CreateBookingRequest, UserId};
use crate::domain::port::{BookingRepository, Logger, RepositoryError};
use std::collections::HashMap;
use std::sync::Arc;

mod product_query_service;

pub use product_query_service::ProductQueryService;

const COMPONENT: &str = "BookingApplicationService";

/// 予約アプリケーションサービス
/// 予約の作成・確定・取得をリポジトリに委譲し、センチネルをドメインエラーに読み替える
pub struct BookingApplicationService {
    booking_repository: Arc<dyn BookingRepository>,
    logger: Arc<dyn Logger>,
}

impl BookingApplicationService {
    /// 新しいアプリケーションサービスを作成
    ///
    /// # Arguments
    /// * `booking_repository` - 予約リポジトリ
    /// * `logger` - ロガー
    pub fn new(booking_repository: Arc<dyn BookingRepository>, logger: Arc<dyn Logger>) -> Self {
        Self {
            booking_repository,
            logger,
        }
    }

    /// 予約を作成
    ///
    /// # Arguments
    /// * `request` - 商品・空き枠・ユニット数・ユーザー
    ///
    /// # Returns
    /// * `Ok(BookingId)` - 作成された予約のID
    /// * `Err(ApplicationError)` - 空きがない（`DomainError::NotAvailable`）またはその他の失敗
    pub async fn create_booking(
        &self,
        request: CreateBookingRequest,
    ) -> Result<BookingId, ApplicationError> {
        let mut context = HashMap::new();
        context.insert("product_id".to_string(), request.product_id.to_string());
        context.insert(
            "availability_id".to_string(),
            request.availability_id.to_string(),
        );
        context.insert("units".to_string(), request.units.to_string());
        context.insert("user_id".to_string(), request.user_id.to_string());

        match self.booking_repository.create(&request).await {
            Ok(booking_id) => {
                context.insert("booking_id".to_string(), booking_id.to_string());
                self.logger
                    .info(COMPONENT, "booking reserved", None, Some(context));
                Ok(booking_id)
            }
            Err(RepositoryError::NotAvailable) => {
                self.logger
                    .info(COMPONENT, "booking not available", None, Some(context));
                Err(DomainError::NotAvailable.into())
            }
            Err(err) => Err(ApplicationError::from_repository(
                "create booking",
                String::new,
                err,
            )),
        }
    }

    /// 予約を確定
    /// 確定済みの予約を再度確定しても成功として扱う
    ///
    /// # Arguments
    /// * `id` - 予約ID
    /// * `user_id` - 呼び出し元のユーザーID
    ///
    /// # Returns
    /// * `Ok(())` - 確定成功
    /// * `Err(ApplicationError)` - 予約が見つからない、またはその他の失敗
    pub async fn confirm_booking(
        &self,
        id: BookingId,
        user_id: UserId,
    ) -> Result<(), ApplicationError> {
        self.booking_repository
            .confirm(id, user_id)
            .await
            .map_err(|err| {
                ApplicationError::from_repository(
                    "confirm booking",
                    || format!("booking {} not found", id),
                    err,
                )
            })?;

        let mut context = HashMap::new();
        context.insert("booking_id".to_string(), id.to_string());
        context.insert("user_id".to_string(), user_id.to_string());
        self.logger
            .info(COMPONENT, "booking confirmed", None, Some(context));

        Ok(())
    }

    /// ユーザーの予約を取得
    ///
    /// # Arguments
    /// * `id` - 予約ID
    /// * `user_id` - 呼び出し元のユーザーID
    /// * `capability` - 付加する追加情報
    pub async fn get_booking(
        &self,
        id: BookingId,
        user_id: UserId,
        capability: Capability,
    ) -> Result<Booking, ApplicationError> {
        self.booking_repository
            .find_by_id(id, user_id, capability)
            .await
            .map_err(|err| {
                ApplicationError::from_repository(
                    "get booking",
                    || format!("booking {} not found", id),
                    err,
                )
            })
    }
}
