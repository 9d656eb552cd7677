use serde::{Deserialize, Serialize};

use crate::errors::FlowError;

/// Services offered by the clinic. Serialized with the exact labels the
/// scheduling backend expects.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ServiceType {
    #[serde(rename = "Psicología")]
    Psychology,
    #[serde(rename = "Medicina General")]
    GeneralMedicine,
    #[serde(rename = "Medicina Alternativa")]
    AlternativeMedicine,
    #[serde(rename = "Terapia Física")]
    PhysicalTherapy,
}

impl ServiceType {
    pub const ALL: [ServiceType; 4] = [
        ServiceType::Psychology,
        ServiceType::GeneralMedicine,
        ServiceType::AlternativeMedicine,
        ServiceType::PhysicalTherapy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Psychology => "Psicología",
            ServiceType::GeneralMedicine => "Medicina General",
            ServiceType::AlternativeMedicine => "Medicina Alternativa",
            ServiceType::PhysicalTherapy => "Terapia Física",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|service| service.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    Name,
    Phone,
    Email,
    Service,
}

impl ContactField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactField::Name => "name",
            ContactField::Phone => "phone",
            ContactField::Email => "email",
            ContactField::Service => "service",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContactInfo {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub service: Option<ServiceType>,
}

impl ContactInfo {
    /// Applies a single field edit. Values are stored as given; trimming is
    /// left to whoever collects the input. An empty service label clears the
    /// selection.
    pub fn set(&mut self, field: ContactField, value: &str) -> Result<(), FlowError> {
        match field {
            ContactField::Name => self.name = value.to_string(),
            ContactField::Phone => self.phone = value.to_string(),
            ContactField::Email => self.email = value.to_string(),
            ContactField::Service => {
                self.service = if value.is_empty() {
                    None
                } else {
                    Some(
                        ServiceType::parse(value)
                            .ok_or_else(|| FlowError::UnknownService(value.to_string()))?,
                    )
                };
            }
        }
        Ok(())
    }

    pub fn missing_fields(&self) -> Vec<ContactField> {
        let mut missing = Vec::new();
        if self.name.is_empty() {
            missing.push(ContactField::Name);
        }
        if self.phone.is_empty() {
            missing.push(ContactField::Phone);
        }
        if self.email.is_empty() {
            missing.push(ContactField::Email);
        }
        if self.service.is_none() {
            missing.push(ContactField::Service);
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}
