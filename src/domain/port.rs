// 出力ポート
// ドメイン層が外部に依存する機能をトレイトとして定義
// アダプター層でこれらのトレイトを実装する

use crate::domain::model::{
    Availability, Booking, BookingId, Capability, CreateBookingRequest, Product, ProductId,
    User, UserId,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use uuid::Uuid;

/// ロガートレイト
/// ログ出力を抽象化するポート
pub trait Logger: Send + Sync {
    /// デバッグレベルのログを出力
    fn debug(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );

    /// 情報レベルのログを出力
    fn info(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );

    /// 警告レベルのログを出力
    fn warn(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );

    /// エラーレベルのログを出力
    fn error(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );
}

/// リポジトリエラー型
/// `NotFound` と `NotAvailable` はサービス層が識別するセンチネル
/// それ以外は不透明な失敗としてそのまま伝播する
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[allow(clippy::enum_variant_names)]
pub enum RepositoryError {
    /// 対象が見つからない
    #[error("not found")]
    NotFound,
    /// 空き枠が足りない
    #[error("not available")]
    NotAvailable,
    /// データベース接続に失敗
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    /// 操作に失敗
    #[error("Operation failed: {0}")]
    OperationFailed(String),
    /// データの取得に失敗
    #[error("Fetch failed: {0}")]
    FetchFailed(String),
}

/// 商品リポジトリトレイト
/// 商品と空き枠の読み取りを抽象化する
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 論理削除されていないすべての商品を取得する
    /// 商品IDの昇順で並べて返す
    async fn find_all(&self, capability: Capability) -> Result<Vec<Product>, RepositoryError>;

    /// 商品IDで商品を検索する
    ///
    /// # Returns
    /// * `Ok(Product)` - 商品が見つかった
    /// * `Err(RepositoryError::NotFound)` - 商品が存在しないか論理削除済み
    async fn find_by_id(
        &self,
        id: ProductId,
        capability: Capability,
    ) -> Result<Product, RepositoryError>;

    /// 指定日の空き枠を取得する
    ///
    /// # Returns
    /// * `Ok(Availability)` - 空き枠が見つかった
    /// * `Err(RepositoryError::NotFound)` - 該当する空き枠がない
    async fn find_availability(
        &self,
        product_id: ProductId,
        local_date: NaiveDate,
        capability: Capability,
    ) -> Result<Availability, RepositoryError>;

    /// 期間内（両端を含む）の空き枠を取得する
    /// 日付の昇順で並べて返す
    async fn find_availabilities(
        &self,
        product_id: ProductId,
        local_date_start: NaiveDate,
        local_date_end: NaiveDate,
        capability: Capability,
    ) -> Result<Vec<Availability>, RepositoryError>;
}

/// 予約リポジトリトレイト
/// 空き数と予約ステータスを変更できる唯一の境界
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// 空き枠を減らし、予約とユニットを一つのトランザクションで作成する
    ///
    /// # Returns
    /// * `Ok(BookingId)` - 作成された予約のID
    /// * `Err(RepositoryError::NotAvailable)` - 空き数不足、または商品と空き枠が一致しない
    async fn create(&self, request: &CreateBookingRequest) -> Result<BookingId, RepositoryError>;

    /// 予約を確定し、各ユニットにチケットを発行する
    /// 確定済みの予約に対しては何も変更せず成功を返す
    ///
    /// # Returns
    /// * `Ok(())` - 確定済み
    /// * `Err(RepositoryError::NotFound)` - 予約が存在しないか、他のユーザーの予約
    async fn confirm(&self, id: BookingId, user_id: UserId) -> Result<(), RepositoryError>;

    /// ユーザーの予約をユニット付きで取得する
    ///
    /// # Returns
    /// * `Ok(Booking)` - 予約が見つかった
    /// * `Err(RepositoryError::NotFound)` - 予約が存在しないか、他のユーザーの予約
    async fn find_by_id(
        &self,
        id: BookingId,
        user_id: UserId,
        capability: Capability,
    ) -> Result<Booking, RepositoryError>;
}

/// ユーザーリポジトリトレイト
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// APIキーでユーザーを検索する
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - 該当するユーザーがいない
    async fn find_by_api_key(&self, api_key: &str) -> Result<User, RepositoryError>;
}

/// データストアの疎通確認
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn ping(&self) -> Result<(), RepositoryError>;
}
