use crate::domain::error::DomainError;
use crate::domain::model::{AvailabilityId, Capability, ProductId};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::NaiveDate;
use serde::Deserialize;
use std::convert::Infallible;
use utoipa::ToSchema;

/// 空き枠照会用のリクエストDTO
/// `localDate` があれば単日、なければ `localDateStart` と `localDateEnd` の期間照会
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequest {
    pub product_id: ProductId,
    pub local_date: Option<NaiveDate>,
    pub local_date_start: Option<NaiveDate>,
    pub local_date_end: Option<NaiveDate>,
}

/// 検証済みの空き枠照会
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityQuery {
    Single {
        product_id: ProductId,
        local_date: NaiveDate,
    },
    Range {
        product_id: ProductId,
        local_date_start: NaiveDate,
        local_date_end: NaiveDate,
    },
}

impl AvailabilityRequest {
    /// 照会の種類を判定する
    /// 単日の指定が期間の指定より優先される
    pub fn into_query(self) -> Result<AvailabilityQuery, DomainError> {
        match (self.local_date, self.local_date_start, self.local_date_end) {
            (Some(local_date), _, _) => Ok(AvailabilityQuery::Single {
                product_id: self.product_id,
                local_date,
            }),
            (None, Some(local_date_start), Some(local_date_end)) => Ok(AvailabilityQuery::Range {
                product_id: self.product_id,
                local_date_start,
                local_date_end,
            }),
            _ => Err(DomainError::InvalidValue(
                "localDate or both localDateStart and localDateEnd are required".to_string(),
            )),
        }
    }
}

/// 予約作成用のリクエストDTO
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub product_id: ProductId,
    pub availability_id: AvailabilityId,
    pub units: u32,
}

impl BookingRequest {
    /// ユニット数を検証する
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.units == 0 {
            return Err(DomainError::InvalidValue(
                "units must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// `Capability` ヘッダーから読み取ったケイパビリティ
/// 認識できない値やヘッダーなしは追加情報なしとして扱い、拒否はしない
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityHeader(pub Capability);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CapabilityHeader
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get("capability")
            .and_then(|value| value.to_str().ok());
        Ok(CapabilityHeader(Capability::from_header_value(value)))
    }
}
