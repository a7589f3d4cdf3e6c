use crate::application::ApplicationError;
use crate::domain::model::{Availability, Capability, Product, ProductId};
use crate::domain::port::ProductRepository;
use chrono::NaiveDate;
use std::sync::Arc;

/// 商品クエリサービス
/// 商品と空き枠の読み取り専用操作を提供する
pub struct ProductQueryService {
    product_repository: Arc<dyn ProductRepository>,
}

impl ProductQueryService {
    /// 新しい商品クエリサービスを作成
    ///
    /// # Arguments
    /// * `product_repository` - 商品リポジトリ
    pub fn new(product_repository: Arc<dyn ProductRepository>) -> Self {
        Self { product_repository }
    }

    /// すべての商品を取得
    /// 商品IDの昇順で並べて返す
    pub async fn get_products(
        &self,
        capability: Capability,
    ) -> Result<Vec<Product>, ApplicationError> {
        self.product_repository
            .find_all(capability)
            .await
            .map_err(|err| ApplicationError::from_repository("get products", String::new, err))
    }

    /// 商品IDで商品を取得
    ///
    /// # Returns
    /// * `Ok(Product)` - 商品が見つかった
    /// * `Err(ApplicationError)` - 商品が存在しない（`DomainError::NotFound`）または取得失敗
    pub async fn get_product(
        &self,
        id: ProductId,
        capability: Capability,
    ) -> Result<Product, ApplicationError> {
        self.product_repository
            .find_by_id(id, capability)
            .await
            .map_err(|err| {
                ApplicationError::from_repository(
                    "get product",
                    || format!("product {} not found", id),
                    err,
                )
            })
    }

    /// 指定日の空き枠を取得
    ///
    /// # Returns
    /// * `Ok(Availability)` - 空き枠が見つかった
    /// * `Err(ApplicationError)` - 空き枠がない（`DomainError::NotFound`）または取得失敗
    pub async fn get_availability(
        &self,
        product_id: ProductId,
        local_date: NaiveDate,
        capability: Capability,
    ) -> Result<Availability, ApplicationError> {
        self.product_repository
            .find_availability(product_id, local_date, capability)
            .await
            .map_err(|err| {
                ApplicationError::from_repository(
                    "get availability",
                    || format!("availability for product {} on {} not found", product_id, local_date),
                    err,
                )
            })
    }

    /// 期間内の空き枠を取得
    /// 日付の昇順で並べて返す。該当がなければ空のリスト
    pub async fn get_availabilities(
        &self,
        product_id: ProductId,
        local_date_start: NaiveDate,
        local_date_end: NaiveDate,
        capability: Capability,
    ) -> Result<Vec<Availability>, ApplicationError> {
        self.product_repository
            .find_availabilities(product_id, local_date_start, local_date_end, capability)
            .await
            .map_err(|err| {
                ApplicationError::from_repository("get availabilities", String::new, err)
            })
    }
}
