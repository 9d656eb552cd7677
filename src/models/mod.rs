pub mod booking;
pub mod contact;
pub mod flow;
pub mod slot;

pub use booking::BookingPayload;
pub use contact::{ContactField, ContactInfo, ServiceType};
pub use flow::{
    ConfirmOutcome, FlowState, FlowStep, FlowView, SearchOutcome, SlotQuery, SlotsView,
    StatusFlags,
};
pub use slot::{RawSlot, Slot, SlotResponse};
