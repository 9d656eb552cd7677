//! Booking wizard state and its transitions.
//!
//! Every transition is a synchronous method on [`FlowState`]. Work that needs
//! the scheduling backend is split into a `begin_*` half, which returns what to
//! send, and a `finish_*` half, which folds the answer back in. The async
//! driver in `services::booking_flow` sits between the two.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{FlowError, ServiceError};

use super::booking::BookingPayload;
use super::contact::{ContactField, ContactInfo, ServiceType};
use super::slot::Slot;

pub const MSG_INCOMPLETE_INFO: &str = "Por favor completa todos los campos.";
pub const MSG_SLOT_FETCH_FAILED: &str = "Error al obtener horarios.";
pub const MSG_BOOKING_FAILED: &str = "Error al agendar. Intenta de nuevo.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FlowStep {
    CollectingInfo,
    SelectingSlot,
    Confirmed,
}

impl FlowStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowStep::CollectingInfo => "collecting_info",
            FlowStep::SelectingSlot => "selecting_slot",
            FlowStep::Confirmed => "confirmed",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StatusFlags {
    pub loading: bool,
    pub error_message: String,
    pub has_searched: bool,
}

/// What the slot area of the calendar step should show, in render precedence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SlotsView {
    Loading,
    Failed,
    Available,
    NoSlots,
    AwaitingDate,
}

/// A slot search handed to the backend. `generation` must be passed back to
/// [`FlowState::finish_search`].
#[derive(Debug, Clone, PartialEq)]
pub struct SlotQuery {
    pub generation: u64,
    pub date: NaiveDate,
    pub service: ServiceType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Loaded(usize),
    Failed,
    /// A newer search, a step change or a reset superseded this one.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// Nothing to submit: no slot selected, busy, or wrong step.
    Skipped,
    Confirmed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlowState {
    pub step: FlowStep,
    pub contact: ContactInfo,
    pub date: NaiveDate,
    pub slots: Vec<Slot>,
    pub selected_slot: Option<Slot>,
    pub status: StatusFlags,
    #[serde(skip)]
    search_generation: u64,
    #[serde(skip)]
    booking_in_flight: bool,
}

impl FlowState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            step: FlowStep::CollectingInfo,
            contact: ContactInfo::default(),
            date: today,
            slots: Vec::new(),
            selected_slot: None,
            status: StatusFlags::default(),
            search_generation: 0,
            booking_in_flight: false,
        }
    }

    pub fn search_generation(&self) -> u64 {
        self.search_generation
    }

    pub fn booking_in_flight(&self) -> bool {
        self.booking_in_flight
    }

    pub fn slots_view(&self) -> SlotsView {
        if self.status.loading {
            SlotsView::Loading
        } else if !self.status.error_message.is_empty() {
            SlotsView::Failed
        } else if !self.slots.is_empty() {
            SlotsView::Available
        } else if self.status.has_searched {
            SlotsView::NoSlots
        } else {
            SlotsView::AwaitingDate
        }
    }

    pub fn can_confirm(&self) -> bool {
        self.step == FlowStep::SelectingSlot
            && self.selected_slot.is_some()
            && !self.status.loading
    }

    fn expect_step(&self, step: FlowStep, action: &'static str) -> Result<(), FlowError> {
        if self.booking_in_flight {
            return Err(FlowError::SubmissionInFlight);
        }
        if self.step != step {
            return Err(FlowError::InvalidTransition {
                action,
                step: self.step.as_str(),
            });
        }
        Ok(())
    }

    fn discard_slots(&mut self) {
        self.slots.clear();
        self.selected_slot = None;
        // invalidates any in-flight search
        self.search_generation += 1;
    }

    pub fn update_contact(&mut self, field: ContactField, value: &str) -> Result<(), FlowError> {
        self.expect_step(FlowStep::CollectingInfo, "edit contact info")?;
        self.contact.set(field, value)
    }

    pub fn submit_info(&mut self) -> Result<(), FlowError> {
        self.expect_step(FlowStep::CollectingInfo, "submit info")?;

        if !self.contact.is_complete() {
            self.status.error_message = MSG_INCOMPLETE_INFO.to_string();
            return Err(FlowError::Validation(MSG_INCOMPLETE_INFO.to_string()));
        }

        self.status = StatusFlags::default();
        self.discard_slots();
        self.step = FlowStep::SelectingSlot;
        Ok(())
    }

    pub fn begin_search(&mut self, date: NaiveDate) -> Result<SlotQuery, FlowError> {
        self.expect_step(FlowStep::SelectingSlot, "select a date")?;
        let service = self
            .contact
            .service
            .ok_or_else(|| FlowError::Validation(MSG_INCOMPLETE_INFO.to_string()))?;

        self.date = date;
        self.discard_slots();
        self.status = StatusFlags {
            loading: true,
            error_message: String::new(),
            has_searched: true,
        };

        Ok(SlotQuery {
            generation: self.search_generation,
            date,
            service,
        })
    }

    pub fn finish_search(
        &mut self,
        generation: u64,
        result: Result<Vec<Slot>, ServiceError>,
    ) -> SearchOutcome {
        if generation != self.search_generation {
            return SearchOutcome::Stale;
        }

        self.status.loading = false;
        match result {
            Ok(slots) => {
                let count = slots.len();
                self.slots = slots;
                SearchOutcome::Loaded(count)
            }
            Err(_) => {
                self.slots.clear();
                self.status.error_message = MSG_SLOT_FETCH_FAILED.to_string();
                SearchOutcome::Failed
            }
        }
    }

    pub fn select_slot(&mut self, slot_id: &str) -> Result<(), FlowError> {
        self.expect_step(FlowStep::SelectingSlot, "select a slot")?;
        let slot = self
            .slots
            .iter()
            .find(|s| s.id == slot_id)
            .cloned()
            .ok_or_else(|| FlowError::UnknownSlot(slot_id.to_string()))?;
        self.selected_slot = Some(slot);
        Ok(())
    }

    /// Returns the payload to submit, or `None` when confirming is currently a
    /// no-op. A `Some` marks the submission as in flight until
    /// [`FlowState::finish_booking`].
    pub fn begin_booking(&mut self) -> Option<BookingPayload> {
        if !self.can_confirm() || self.booking_in_flight {
            return None;
        }
        let slot = self.selected_slot.as_ref()?;
        let payload = BookingPayload::new(&self.contact, self.date, slot)?;

        self.status.loading = true;
        self.booking_in_flight = true;
        Some(payload)
    }

    pub fn finish_booking(&mut self, result: Result<(), ServiceError>) -> ConfirmOutcome {
        if !self.booking_in_flight {
            return ConfirmOutcome::Skipped;
        }

        self.booking_in_flight = false;
        self.status.loading = false;
        match result {
            Ok(()) => {
                self.step = FlowStep::Confirmed;
                ConfirmOutcome::Confirmed
            }
            Err(_) => {
                self.status.error_message = MSG_BOOKING_FAILED.to_string();
                ConfirmOutcome::Failed
            }
        }
    }

    pub fn go_back(&mut self) -> Result<(), FlowError> {
        self.expect_step(FlowStep::SelectingSlot, "go back")?;
        self.discard_slots();
        self.status = StatusFlags::default();
        self.step = FlowStep::CollectingInfo;
        Ok(())
    }

    pub fn reset(&mut self, today: NaiveDate) -> Result<(), FlowError> {
        if self.booking_in_flight {
            return Err(FlowError::SubmissionInFlight);
        }
        let generation = self.search_generation + 1;
        *self = Self::new(today);
        self.search_generation = generation;
        Ok(())
    }
}

/// Snapshot handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct FlowView {
    #[serde(flatten)]
    pub state: FlowState,
    pub slots_view: SlotsView,
    pub can_confirm: bool,
}

impl From<FlowState> for FlowView {
    fn from(state: FlowState) -> Self {
        Self {
            slots_view: state.slots_view(),
            can_confirm: state.can_confirm(),
            state,
        }
    }
}
