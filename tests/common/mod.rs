// 統合テスト用のインメモリストア
// すべての出力ポートを一つのロックの下で実装する

#![allow(dead_code)]

use async_trait::async_trait;
use booking_service::adapter::driven::{project_bookings, BookingRow, TracingLogger};
use booking_service::adapter::driver::{create_router, AppState};
use booking_service::application::service::{BookingApplicationService, ProductQueryService};
use booking_service::domain::model::{
    Availability, AvailabilityBase, AvailabilityId, Booking, BookingId, BookingStatus,
    Capability, CreateBookingRequest, Price, Priced, Product, ProductBase, ProductId, Ticket,
    User, UserId,
};
use booking_service::domain::port::{
    BookingRepository, HealthCheck, ProductRepository, RepositoryError, UserRepository,
};
use axum::Router;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::Mutex;

struct ProductRecord {
    base: ProductBase,
    price: Option<Price>,
    deleted: bool,
}

struct AvailabilityRecord {
    id: AvailabilityId,
    product_id: ProductId,
    local_date: NaiveDate,
    vacancies: i32,
}

struct UnitRecord {
    id: i64,
    ticket: Option<Ticket>,
}

struct BookingRecord {
    id: BookingId,
    product_id: ProductId,
    availability_id: AvailabilityId,
    user_id: UserId,
    status: BookingStatus,
    units: Vec<UnitRecord>,
}

struct UserRecord {
    user: User,
    api_key: String,
}

#[derive(Default)]
struct State {
    products: Vec<ProductRecord>,
    availabilities: Vec<AvailabilityRecord>,
    bookings: Vec<BookingRecord>,
    users: Vec<UserRecord>,
    next_id: i64,
    unhealthy: bool,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    // 価格ケイパビリティでは価格のない商品は見えない
    fn visible_product(&self, id: ProductId, capability: Capability) -> Option<&ProductRecord> {
        self.products.iter().find(|p| {
            p.base.id() == id
                && !p.deleted
                && (capability == Capability::None || p.price.is_some())
        })
    }

    fn price_of(&self, id: ProductId) -> Option<Price> {
        self.products
            .iter()
            .find(|p| p.base.id() == id)
            .and_then(|p| p.price.clone())
    }

    fn availability(
        &self,
        record: &AvailabilityRecord,
        capability: Capability,
    ) -> Option<Availability> {
        let base = AvailabilityBase::new(record.id, record.local_date, record.vacancies);
        match capability {
            Capability::None => Some(Availability::Base(base)),
            Capability::Price => self
                .price_of(record.product_id)
                .map(|price| Availability::WithPrice(Priced::new(base, price))),
        }
    }
}

/// インメモリストア
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_product(&self, name: &str, capacity: i32, price: Option<Price>) -> ProductId {
        let mut state = self.state.lock().await;
        let id = ProductId::new(state.next_id());
        state.products.push(ProductRecord {
            base: ProductBase::new(id, name, capacity),
            price,
            deleted: false,
        });
        id
    }

    pub async fn delete_product(&self, id: ProductId) {
        let mut state = self.state.lock().await;
        if let Some(product) = state.products.iter_mut().find(|p| p.base.id() == id) {
            product.deleted = true;
        }
    }

    pub async fn add_availability(
        &self,
        product_id: ProductId,
        local_date: NaiveDate,
        vacancies: i32,
    ) -> AvailabilityId {
        let mut state = self.state.lock().await;
        let id = AvailabilityId::new(state.next_id());
        state.availabilities.push(AvailabilityRecord {
            id,
            product_id,
            local_date,
            vacancies,
        });
        id
    }

    pub async fn add_user(&self, email: &str, api_key: &str) -> UserId {
        let mut state = self.state.lock().await;
        let id = UserId::new(state.next_id());
        state.users.push(UserRecord {
            user: User::new(id, email),
            api_key: api_key.to_string(),
        });
        id
    }

    pub async fn vacancies(&self, id: AvailabilityId) -> i32 {
        let state = self.state.lock().await;
        state
            .availabilities
            .iter()
            .find(|a| a.id == id)
            .map(|a| a.vacancies)
            .unwrap_or_default()
    }

    pub async fn booking_count(&self) -> usize {
        self.state.lock().await.bookings.len()
    }

    pub async fn set_unhealthy(&self) {
        self.state.lock().await.unhealthy = true;
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn find_all(&self, capability: Capability) -> Result<Vec<Product>, RepositoryError> {
        let state = self.state.lock().await;
        let mut products: Vec<Product> = state
            .products
            .iter()
            .filter(|p| state.visible_product(p.base.id(), capability).is_some())
            .map(|p| match (capability, &p.price) {
                (Capability::Price, Some(price)) => {
                    Product::WithPrice(Priced::new(p.base.clone(), price.clone()))
                }
                _ => Product::Base(p.base.clone()),
            })
            .collect();
        products.sort_by_key(|p| match p {
            Product::Base(base) => base.id(),
            Product::WithPrice(priced) => priced.base().id(),
        });
        Ok(products)
    }

    async fn find_by_id(
        &self,
        id: ProductId,
        capability: Capability,
    ) -> Result<Product, RepositoryError> {
        let state = self.state.lock().await;
        let record = state
            .visible_product(id, capability)
            .ok_or(RepositoryError::NotFound)?;
        Ok(match (capability, &record.price) {
            (Capability::Price, Some(price)) => {
                Product::WithPrice(Priced::new(record.base.clone(), price.clone()))
            }
            _ => Product::Base(record.base.clone()),
        })
    }

    async fn find_availability(
        &self,
        product_id: ProductId,
        local_date: NaiveDate,
        capability: Capability,
    ) -> Result<Availability, RepositoryError> {
        let state = self.state.lock().await;
        state
            .availabilities
            .iter()
            .find(|a| a.product_id == product_id && a.local_date == local_date)
            .and_then(|a| state.availability(a, capability))
            .ok_or(RepositoryError::NotFound)
    }

    async fn find_availabilities(
        &self,
        product_id: ProductId,
        local_date_start: NaiveDate,
        local_date_end: NaiveDate,
        capability: Capability,
    ) -> Result<Vec<Availability>, RepositoryError> {
        let state = self.state.lock().await;
        let mut records: Vec<&AvailabilityRecord> = state
            .availabilities
            .iter()
            .filter(|a| {
                a.product_id == product_id
                    && a.local_date >= local_date_start
                    && a.local_date <= local_date_end
            })
            .collect();
        records.sort_by_key(|a| a.local_date);
        Ok(records
            .into_iter()
            .filter_map(|a| state.availability(a, capability))
            .collect())
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn create(&self, request: &CreateBookingRequest) -> Result<BookingId, RepositoryError> {
        let mut state = self.state.lock().await;
        let units = i32::try_from(request.units).map_err(|_| RepositoryError::NotAvailable)?;

        let availability = state
            .availabilities
            .iter_mut()
            .find(|a| {
                a.id == request.availability_id
                    && a.product_id == request.product_id
                    && a.vacancies >= units
            })
            .ok_or(RepositoryError::NotAvailable)?;
        availability.vacancies -= units;

        let id = BookingId::new(state.next_id());
        let mut unit_records = Vec::new();
        for _ in 0..request.units {
            unit_records.push(UnitRecord {
                id: state.next_id(),
                ticket: None,
            });
        }
        state.bookings.push(BookingRecord {
            id,
            product_id: request.product_id,
            availability_id: request.availability_id,
            user_id: request.user_id,
            status: BookingStatus::Reserved,
            units: unit_records,
        });
        Ok(id)
    }

    async fn confirm(&self, id: BookingId, user_id: UserId) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().await;
        let booking = state
            .bookings
            .iter_mut()
            .find(|b| b.id == id && b.user_id == user_id)
            .ok_or(RepositoryError::NotFound)?;

        if booking.status == BookingStatus::Confirmed {
            return Ok(());
        }
        booking.status = BookingStatus::Confirmed;
        for unit in &mut booking.units {
            unit.ticket = Some(Ticket::generate());
        }
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: BookingId,
        user_id: UserId,
        capability: Capability,
    ) -> Result<Booking, RepositoryError> {
        let state = self.state.lock().await;
        let booking = state
            .bookings
            .iter()
            .find(|b| b.id == id && b.user_id == user_id)
            .ok_or(RepositoryError::NotFound)?;

        let price = match capability {
            Capability::None => None,
            Capability::Price => Some(
                state
                    .price_of(booking.product_id)
                    .ok_or(RepositoryError::NotFound)?,
            ),
        };

        let rows = booking
            .units
            .iter()
            .map(|unit| BookingRow {
                booking_id: booking.id.value(),
                product_id: booking.product_id.value(),
                availability_id: booking.availability_id.value(),
                status: booking.status.as_str().to_string(),
                unit_id: unit.id,
                ticket: unit.ticket.as_ref().map(|t| t.as_str().to_string()),
                price: price.clone(),
            })
            .collect();

        project_bookings(rows, capability)?
            .into_iter()
            .next()
            .ok_or(RepositoryError::NotFound)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_api_key(&self, api_key: &str) -> Result<User, RepositoryError> {
        let state = self.state.lock().await;
        state
            .users
            .iter()
            .find(|u| u.api_key == api_key)
            .map(|u| u.user.clone())
            .ok_or(RepositoryError::NotFound)
    }
}

#[async_trait]
impl HealthCheck for InMemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        if self.state.lock().await.unhealthy {
            return Err(RepositoryError::ConnectionFailed("store is down".to_string()));
        }
        Ok(())
    }
}

/// インメモリストアでルーターを組み立てる
pub fn router(store: &InMemoryStore) -> Router {
    let store = Arc::new(store.clone());
    let logger = Arc::new(TracingLogger::new());

    create_router(AppState {
        booking_service: Arc::new(BookingApplicationService::new(store.clone(), logger.clone())),
        product_query_service: Arc::new(ProductQueryService::new(store.clone())),
        user_repository: store.clone(),
        health_check: store,
        logger,
    })
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}
