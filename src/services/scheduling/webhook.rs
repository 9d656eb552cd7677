use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

use super::SchedulingBackend;
use crate::errors::ServiceError;
use crate::models::{BookingPayload, ServiceType, Slot, SlotResponse};

/// Body of every call to the webhook; the `action` field picks the operation.
#[derive(Debug, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum WebhookRequest<'a> {
    GetSlots {
        date: NaiveDate,
        service: ServiceType,
    },
    CreateBooking(&'a BookingPayload),
}

impl WebhookRequest<'_> {
    fn action(&self) -> &'static str {
        match self {
            WebhookRequest::GetSlots { .. } => "get_slots",
            WebhookRequest::CreateBooking(_) => "create_booking",
        }
    }
}

pub struct WebhookBackend {
    url: String,
    client: reqwest::Client,
}

impl WebhookBackend {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(url: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build webhook HTTP client")?;
        Ok(Self { url, client })
    }

    async fn post(&self, request: &WebhookRequest<'_>) -> Result<reqwest::Response, String> {
        let resp = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = resp.status();
        tracing::debug!(action = request.action(), %status, "scheduling webhook responded");

        if !status.is_success() {
            return Err(format!("webhook returned {status}"));
        }
        Ok(resp)
    }
}

#[async_trait]
impl SchedulingBackend for WebhookBackend {
    async fn fetch_slots(
        &self,
        date: NaiveDate,
        service: ServiceType,
    ) -> Result<Vec<Slot>, ServiceError> {
        let request = WebhookRequest::GetSlots { date, service };

        let result = async {
            let resp = self.post(&request).await?;
            let body: SlotResponse = resp
                .json()
                .await
                .map_err(|e| format!("unreadable slot response: {e}"))?;
            Ok::<_, String>(body.into_slots())
        }
        .await;

        result.map_err(ServiceError::SlotFetch)
    }

    async fn submit_booking(&self, payload: &BookingPayload) -> Result<(), ServiceError> {
        self.post(&WebhookRequest::CreateBooking(payload))
            .await
            .map(|_| ())
            .map_err(ServiceError::BookingSubmission)
    }
}
