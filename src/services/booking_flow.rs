use std::sync::{Arc, Mutex, PoisonError};

use chrono::{Local, NaiveDate};
use tokio::sync::watch;

use crate::errors::{FlowError, ServiceError};
use crate::models::{ConfirmOutcome, ContactField, FlowState, SearchOutcome};
use crate::services::scheduling::SchedulingBackend;

/// Drives one booking flow against the scheduling backend.
///
/// The state lock is only held while a transition runs, never across a
/// backend call, so overlapping date searches interleave and the generation
/// check in [`FlowState::finish_search`] decides which answer sticks.
pub struct BookingController {
    backend: Arc<dyn SchedulingBackend>,
    state: Mutex<FlowState>,
    updates: watch::Sender<FlowState>,
    today: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl BookingController {
    pub fn new(backend: Arc<dyn SchedulingBackend>) -> Self {
        Self::with_clock(backend, local_today)
    }

    pub fn with_clock(backend: Arc<dyn SchedulingBackend>, today: fn() -> NaiveDate) -> Self {
        let state = FlowState::new(today());
        let (updates, _) = watch::channel(state.clone());
        Self {
            backend,
            state: Mutex::new(state),
            updates,
            today,
        }
    }

    pub fn snapshot(&self) -> FlowState {
        self.lock().clone()
    }

    /// Every transition, including late backend answers, publishes here.
    pub fn subscribe(&self) -> watch::Receiver<FlowState> {
        self.updates.subscribe()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FlowState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply<R>(&self, transition: impl FnOnce(&mut FlowState) -> R) -> R {
        let mut state = self.lock();
        let out = transition(&mut *state);
        self.updates.send_replace(state.clone());
        out
    }

    pub fn update_contact(&self, field: ContactField, value: &str) -> Result<(), FlowError> {
        self.apply(|s| s.update_contact(field, value))
    }

    pub fn submit_info(&self) -> Result<(), FlowError> {
        let (result, missing) = self.apply(|s| {
            let missing: Vec<&'static str> = s
                .contact
                .missing_fields()
                .iter()
                .map(ContactField::as_str)
                .collect();
            (s.submit_info(), missing)
        });
        match &result {
            Ok(()) => tracing::info!("contact info accepted, moving to slot selection"),
            Err(e) => tracing::debug!(error = %e, ?missing, "contact info rejected"),
        }
        result
    }

    pub async fn select_date(&self, date: NaiveDate) -> Result<SearchOutcome, FlowError> {
        let query = self.apply(|s| s.begin_search(date))?;
        tracing::info!(
            %date,
            service = query.service.as_str(),
            generation = query.generation,
            "fetching slots"
        );

        let guard = SettleOnDrop::new(self, Pending::Search(query.generation));
        let result = self.backend.fetch_slots(query.date, query.service).await;
        guard.disarm();
        if let Err(e) = &result {
            tracing::warn!(%date, error = %e, "slot fetch failed");
        }

        let outcome = self.apply(|s| s.finish_search(query.generation, result));
        match outcome {
            SearchOutcome::Stale => tracing::debug!(
                %date,
                generation = query.generation,
                "discarding superseded slot response"
            ),
            SearchOutcome::Loaded(count) => tracing::info!(%date, count, "slots loaded"),
            SearchOutcome::Failed => {}
        }
        Ok(outcome)
    }

    pub fn select_slot(&self, slot_id: &str) -> Result<(), FlowError> {
        self.apply(|s| s.select_slot(slot_id))
    }

    /// Submits the booking for the selected slot. Without a selected slot, or
    /// while another submission is pending, this does nothing.
    ///
    /// Dropping the returned future before the backend answers settles the
    /// flow as a failed submission, so the user can retry, go back or reset.
    pub async fn confirm(&self) -> ConfirmOutcome {
        let Some(payload) = self.apply(FlowState::begin_booking) else {
            return ConfirmOutcome::Skipped;
        };
        tracing::info!(
            date = %payload.date,
            time = payload.time.as_str(),
            service = payload.service.as_str(),
            "submitting booking"
        );

        let guard = SettleOnDrop::new(self, Pending::Booking);
        let result = self.backend.submit_booking(&payload).await;
        guard.disarm();
        if let Err(e) = &result {
            tracing::warn!(error = %e, "booking submission failed");
        }

        let outcome = self.apply(|s| s.finish_booking(result));
        if outcome == ConfirmOutcome::Confirmed {
            tracing::info!(date = %payload.date, time = payload.time.as_str(), "booking confirmed");
        }
        outcome
    }

    pub fn go_back(&self) -> Result<(), FlowError> {
        self.apply(FlowState::go_back)
    }

    pub fn reset(&self) -> Result<(), FlowError> {
        let today = (self.today)();
        self.apply(|s| s.reset(today))
    }
}

enum Pending {
    Search(u64),
    Booking,
}

/// Settles a backend call whose future was dropped before it finished
/// (client disconnect, caller timeout), so the flow never stays in flight.
struct SettleOnDrop<'a> {
    controller: &'a BookingController,
    pending: Option<Pending>,
}

impl<'a> SettleOnDrop<'a> {
    fn new(controller: &'a BookingController, pending: Pending) -> Self {
        Self {
            controller,
            pending: Some(pending),
        }
    }

    fn disarm(mut self) {
        self.pending = None;
    }
}

impl Drop for SettleOnDrop<'_> {
    fn drop(&mut self) {
        match self.pending.take() {
            Some(Pending::Search(generation)) => {
                let outcome = self.controller.apply(|s| {
                    s.finish_search(
                        generation,
                        Err(ServiceError::SlotFetch("request cancelled".to_string())),
                    )
                });
                tracing::debug!(generation, ?outcome, "slot fetch cancelled");
            }
            Some(Pending::Booking) => {
                self.controller.apply(|s| {
                    s.finish_booking(Err(ServiceError::BookingSubmission(
                        "request cancelled".to_string(),
                    )))
                });
                tracing::warn!("booking submission cancelled before the backend answered");
            }
            None => {}
        }
    }
}
