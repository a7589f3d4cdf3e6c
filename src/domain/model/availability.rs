use crate::domain::model::capability::{CapabilityView, Price, Priced};
use crate::domain::model::{AvailabilityId, AvailabilityStatus};
use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

/// 追加情報なしの空き枠
/// ステータスと予約可否は空き数から導出する
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityBase {
    id: AvailabilityId,
    local_date: NaiveDate,
    status: AvailabilityStatus,
    vacancies: i32,
    available: bool,
}

impl AvailabilityBase {
    /// 空き枠を作成
    ///
    /// # Arguments
    /// * `id` - 空き枠ID
    /// * `local_date` - 現地日付
    /// * `vacancies` - 残りの空き数
    pub fn new(id: AvailabilityId, local_date: NaiveDate, vacancies: i32) -> Self {
        Self {
            id,
            local_date,
            status: AvailabilityStatus::from_vacancies(vacancies),
            vacancies,
            available: vacancies > 0,
        }
    }

    pub fn id(&self) -> AvailabilityId {
        self.id
    }

    pub fn local_date(&self) -> NaiveDate {
        self.local_date
    }

    pub fn status(&self) -> AvailabilityStatus {
        self.status
    }

    pub fn vacancies(&self) -> i32 {
        self.vacancies
    }

    pub fn is_available(&self) -> bool {
        self.available
    }
}

/// 空き枠
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum Availability {
    Base(AvailabilityBase),
    WithPrice(Priced<AvailabilityBase>),
}

impl CapabilityView for Availability {
    type Base = AvailabilityBase;

    fn base(&self) -> &AvailabilityBase {
        match self {
            Availability::Base(base) => base,
            Availability::WithPrice(priced) => priced.base(),
        }
    }

    fn price(&self) -> Option<&Price> {
        match self {
            Availability::Base(_) => None,
            Availability::WithPrice(priced) => Some(priced.price()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 20).unwrap()
    }

    #[test]
    fn test_status_is_derived_from_vacancies() {
        let available = AvailabilityBase::new(AvailabilityId::new(1), date(), 10);
        assert_eq!(available.status(), AvailabilityStatus::Available);
        assert!(available.is_available());

        let sold_out = AvailabilityBase::new(AvailabilityId::new(2), date(), 0);
        assert_eq!(sold_out.status(), AvailabilityStatus::SoldOut);
        assert!(!sold_out.is_available());
    }

    #[test]
    fn test_serialization() {
        let availability =
            Availability::Base(AvailabilityBase::new(AvailabilityId::new(123), date(), 10));
        let value = serde_json::to_value(&availability).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "123",
                "localDate": "2025-01-20",
                "status": "AVAILABLE",
                "vacancies": 10,
                "available": true
            })
        );
    }

    #[test]
    fn test_with_price_serialization() {
        let availability = Availability::WithPrice(Priced::new(
            AvailabilityBase::new(AvailabilityId::new(123), date(), 0),
            Price::new(100, "EUR"),
        ));
        let value = serde_json::to_value(&availability).unwrap();
        assert_eq!(value["status"], "SOLD_OUT");
        assert_eq!(value["available"], false);
        assert_eq!(value["price"], 100);
        assert_eq!(value["currency"], "EUR");
    }
}
