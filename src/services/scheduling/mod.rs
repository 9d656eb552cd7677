pub mod webhook;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::ServiceError;
use crate::models::{BookingPayload, ServiceType, Slot};

/// The remote scheduling backend: computes free slots and records bookings.
/// One attempt per call; no caching or retries.
#[async_trait]
pub trait SchedulingBackend: Send + Sync {
    async fn fetch_slots(
        &self,
        date: NaiveDate,
        service: ServiceType,
    ) -> Result<Vec<Slot>, ServiceError>;

    async fn submit_booking(&self, payload: &BookingPayload) -> Result<(), ServiceError>;
}
