//! Custom actions executed on behalf of the dialogue framework.
//!
//! The framework decides which action runs next and sends the tracker
//! snapshot; actions answer with bot responses and events. Every action that
//! speaks localizes its Spanish text through `ResponseLocalizer`.

mod handlers;
pub mod responses;

pub use handlers::{
    ActionContarCuriosidad, ActionDespedida, ActionPreguntarNombre,
    ActionResponderAgradecimiento, ActionSaludoPersonalizado, ActionSetDetectedLanguage,
};

use crate::conversation::{ConversationState, Event};
use crate::localizer::ResponseLocalizer;
use crate::message::Message;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Snapshot of the framework's conversation tracker.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tracker {
    #[serde(default)]
    pub sender_id: String,

    #[serde(default)]
    pub slots: Map<String, Value>,

    #[serde(default)]
    pub latest_message: Message,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConversationState for Tracker {
    fn get_slot(&self, name: &str) -> Option<&Value> {
        self.slots.get(name).filter(|v| !v.is_null())
    }

    fn set_slot(&mut self, name: &str, value: Value) {
        self.slots.insert(name.to_string(), value);
    }
}

/// A request from the framework to run one action.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionCall {
    pub next_action: String,

    #[serde(default)]
    pub sender_id: String,

    #[serde(default)]
    pub tracker: Tracker,

    #[serde(default)]
    pub domain: Value,

    #[serde(default)]
    pub version: Option<String>,
}

/// A message the bot sends to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotResponse {
    pub text: String,
}

/// What an action hands back to the framework.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionResponse {
    pub events: Vec<Event>,
    pub responses: Vec<BotResponse>,
}

/// Collects the messages an action wants to send.
#[derive(Debug, Default)]
pub struct CollectingDispatcher {
    messages: Vec<BotResponse>,
}

impl CollectingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn utter_message(&mut self, text: impl Into<String>) {
        self.messages.push(BotResponse { text: text.into() });
    }

    pub fn into_messages(self) -> Vec<BotResponse> {
        self.messages
    }
}

/// A named custom action.
#[async_trait]
pub trait Action: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self, dispatcher: &mut CollectingDispatcher, tracker: &Tracker) -> Vec<Event>;
}

#[derive(Debug, Error)]
#[error("No registered action found for name '{0}'.")]
pub struct ActionNotFound(pub String);

/// Actions by name.
#[derive(Default)]
pub struct ActionRegistry {
    actions: BTreeMap<&'static str, Arc<dyn Action>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every action of the bot, localizing through `localizer`.
    pub fn with_default_actions(localizer: Arc<ResponseLocalizer>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ActionSetDetectedLanguage::new(Arc::clone(&localizer))));
        registry.register(Arc::new(ActionPreguntarNombre::new(Arc::clone(&localizer))));
        registry.register(Arc::new(ActionContarCuriosidad::new(Arc::clone(&localizer))));
        registry.register(Arc::new(ActionSaludoPersonalizado::new(Arc::clone(&localizer))));
        registry.register(Arc::new(ActionResponderAgradecimiento::new(Arc::clone(
            &localizer,
        ))));
        registry.register(Arc::new(ActionDespedida::new(localizer)));
        registry
    }

    /// Register an action, replacing any action with the same name.
    pub fn register(&mut self, action: Arc<dyn Action>) {
        self.actions.insert(action.name(), action);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Action>> {
        self.actions.get(name)
    }

    /// Registered action names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        self.actions.keys().copied().collect()
    }

    /// Run the action the framework asked for.
    pub async fn run(&self, call: &ActionCall) -> Result<ActionResponse, ActionNotFound> {
        let action = self
            .get(&call.next_action)
            .ok_or_else(|| ActionNotFound(call.next_action.clone()))?;

        info!(
            "Running action {} for sender {}",
            call.next_action, call.sender_id
        );

        let mut dispatcher = CollectingDispatcher::new();
        let events = action.run(&mut dispatcher, &call.tracker).await;

        Ok(ActionResponse {
            events,
            responses: dispatcher.into_messages(),
        })
    }
}
