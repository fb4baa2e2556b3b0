//! Access to host-owned conversation state.
//!
//! The dialogue framework owns the tracker and its slots. This crate only reads
//! and writes a couple of named slots, through `ConversationState`.

use crate::i18n::LanguageCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Slot holding the language most recently detected for the conversation.
pub const DETECTED_LANGUAGE_SLOT: &str = "detected_language";

/// Slot holding the user's name, filled by the host's slot mappings.
pub const USER_NAME_SLOT: &str = "nombre_usuario";

/// An event handed back to the host framework.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum Event {
    /// Set a slot on the conversation tracker
    #[serde(rename = "slot")]
    SlotSet {
        name: String,
        value: Value,
        #[serde(default)]
        timestamp: Option<f64>,
    },
}

impl Event {
    pub fn slot_set(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Event::SlotSet {
            name: name.into(),
            value: value.into(),
            timestamp: None,
        }
    }
}

/// Read/write access to conversation slots.
pub trait ConversationState {
    /// Current value of a slot. Unset and `null` slots are `None`.
    fn get_slot(&self, name: &str) -> Option<&Value>;

    fn set_slot(&mut self, name: &str, value: Value);

    /// A slot's value as a non-empty string.
    fn slot_str(&self, name: &str) -> Option<&str> {
        self.get_slot(name)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// The detected language slot, if set to a valid language code.
    fn detected_language(&self) -> Option<LanguageCode> {
        self.slot_str(DETECTED_LANGUAGE_SLOT)
            .and_then(|code| LanguageCode::parse(code).ok())
    }

    fn set_detected_language(&mut self, language: &LanguageCode) {
        self.set_slot(DETECTED_LANGUAGE_SLOT, Value::String(language.to_string()));
    }
}

/// In-memory slots that remember which ones were written.
///
/// Used when the host sends its slots along with the messages and expects
/// the changes back as events.
#[derive(Debug, Clone, Default)]
pub struct SlotMap {
    slots: Map<String, Value>,
    changed: Vec<String>,
}

impl SlotMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_slots(slots: Map<String, Value>) -> Self {
        Self {
            slots,
            changed: Vec::new(),
        }
    }

    pub fn slots(&self) -> &Map<String, Value> {
        &self.slots
    }

    /// `SlotSet` events for every slot written since creation, in write order.
    pub fn events(&self) -> Vec<Event> {
        self.changed
            .iter()
            .filter_map(|name| {
                self.slots
                    .get(name)
                    .map(|value| Event::slot_set(name.clone(), value.clone()))
            })
            .collect()
    }
}

impl ConversationState for SlotMap {
    fn get_slot(&self, name: &str) -> Option<&Value> {
        self.slots.get(name).filter(|v| !v.is_null())
    }

    fn set_slot(&mut self, name: &str, value: Value) {
        if !self.changed.iter().any(|n| n == name) {
            self.changed.push(name.to_string());
        }
        self.slots.insert(name.to_string(), value);
    }
}
