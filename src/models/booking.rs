use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::contact::{ContactInfo, ServiceType};
use super::slot::Slot;

/// What gets sent to the backend on confirmation. Built from the flow state at
/// submit time and never kept afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingPayload {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub service: ServiceType,
    pub date: NaiveDate,
    pub time: String,
}

impl BookingPayload {
    pub fn new(contact: &ContactInfo, date: NaiveDate, slot: &Slot) -> Option<Self> {
        Some(Self {
            name: contact.name.clone(),
            phone: contact.phone.clone(),
            email: contact.email.clone(),
            service: contact.service?,
            date,
            time: slot.time.clone(),
        })
    }
}
