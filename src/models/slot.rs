use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Slot {
    pub id: String,
    pub time: String,
}

/// Ids and times arrive as strings or numbers depending on the upstream flow.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SlotValue {
    Text(String),
    Number(serde_json::Number),
}

impl SlotValue {
    /// `None` for values that carry nothing: an empty string or zero.
    fn into_text(self) -> Option<String> {
        match self {
            SlotValue::Text(s) if s.is_empty() => None,
            SlotValue::Text(s) => Some(s),
            SlotValue::Number(n) if n.as_f64() == Some(0.0) => None,
            SlotValue::Number(n) => Some(n.to_string()),
        }
    }
}

/// A slot as the scheduling backend sends it. Either field may be missing.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSlot {
    #[serde(default)]
    pub id: Option<SlotValue>,
    #[serde(default)]
    pub time: Option<SlotValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WrappedSlots {
    #[serde(default)]
    pub slots: Option<Vec<RawSlot>>,
}

/// The backend answers `get_slots` with either a bare array of slots or an
/// object carrying them under `slots`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SlotResponse {
    Bare(Vec<RawSlot>),
    Wrapped(WrappedSlots),
}

impl SlotResponse {
    /// Flattens either shape into bookable slots, dropping entries without a
    /// time. Upstream order is kept.
    pub fn into_slots(self) -> Vec<Slot> {
        let raw = match self {
            SlotResponse::Bare(slots) => slots,
            SlotResponse::Wrapped(wrapped) => wrapped.slots.unwrap_or_default(),
        };

        raw.into_iter()
            .filter_map(|slot| {
                let time = slot.time.and_then(SlotValue::into_text)?;
                let id = slot
                    .id
                    .and_then(SlotValue::into_text)
                    .unwrap_or_else(|| time.clone());
                Some(Slot { id, time })
            })
            .collect()
    }
}
