use super::responses;
use super::{Action, CollectingDispatcher, Tracker};
use crate::conversation::{ConversationState, Event, DETECTED_LANGUAGE_SLOT, USER_NAME_SLOT};
use crate::localizer::ResponseLocalizer;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use std::sync::Arc;

/// The user's name from the tracker, or the generic fallback.
fn user_name(tracker: &Tracker) -> &str {
    tracker
        .slot_str(USER_NAME_SLOT)
        .unwrap_or(responses::DEFAULT_USER_NAME)
}

/// Stores the language the pipeline detected for the latest message in the
/// `detected_language` slot.
pub struct ActionSetDetectedLanguage {
    localizer: Arc<ResponseLocalizer>,
}

impl ActionSetDetectedLanguage {
    pub fn new(localizer: Arc<ResponseLocalizer>) -> Self {
        Self { localizer }
    }
}

#[async_trait]
impl Action for ActionSetDetectedLanguage {
    fn name(&self) -> &'static str {
        "action_set_detected_language"
    }

    async fn run(&self, dispatcher: &mut CollectingDispatcher, tracker: &Tracker) -> Vec<Event> {
        let language = tracker
            .latest_message
            .detected_language
            .clone()
            .unwrap_or_else(|| self.localizer.reference_language().clone());

        dispatcher.utter_message(
            responses::LANGUAGE_DETECTED.replace("{idioma}", language.as_str()),
        );

        vec![Event::slot_set(DETECTED_LANGUAGE_SLOT, language.to_string())]
    }
}

pub struct ActionPreguntarNombre {
    localizer: Arc<ResponseLocalizer>,
}

impl ActionPreguntarNombre {
    pub fn new(localizer: Arc<ResponseLocalizer>) -> Self {
        Self { localizer }
    }
}

#[async_trait]
impl Action for ActionPreguntarNombre {
    fn name(&self) -> &'static str {
        "action_preguntar_nombre"
    }

    async fn run(&self, dispatcher: &mut CollectingDispatcher, tracker: &Tracker) -> Vec<Event> {
        let text = self.localizer.localize_for(responses::ASK_NAME, tracker).await;
        dispatcher.utter_message(text);
        Vec::new()
    }
}

/// Tells a random fun fact.
pub struct ActionContarCuriosidad {
    localizer: Arc<ResponseLocalizer>,
}

impl ActionContarCuriosidad {
    pub fn new(localizer: Arc<ResponseLocalizer>) -> Self {
        Self { localizer }
    }
}

#[async_trait]
impl Action for ActionContarCuriosidad {
    fn name(&self) -> &'static str {
        "action_contar_curiosidad"
    }

    async fn run(&self, dispatcher: &mut CollectingDispatcher, tracker: &Tracker) -> Vec<Event> {
        let fact = {
            let mut rng = rand::thread_rng();
            responses::FUN_FACTS
                .choose(&mut rng)
                .copied()
                .unwrap_or(responses::FUN_FACTS[0])
        };

        let text = self.localizer.localize_for(fact, tracker).await;
        dispatcher.utter_message(text);
        Vec::new()
    }
}

pub struct ActionSaludoPersonalizado {
    localizer: Arc<ResponseLocalizer>,
}

impl ActionSaludoPersonalizado {
    pub fn new(localizer: Arc<ResponseLocalizer>) -> Self {
        Self { localizer }
    }
}

#[async_trait]
impl Action for ActionSaludoPersonalizado {
    fn name(&self) -> &'static str {
        "action_saludo_personalizado"
    }

    async fn run(&self, dispatcher: &mut CollectingDispatcher, tracker: &Tracker) -> Vec<Event> {
        let greeting = responses::PERSONALIZED_GREETING.replace("{nombre}", user_name(tracker));
        let text = self.localizer.localize_for(&greeting, tracker).await;
        dispatcher.utter_message(text);
        Vec::new()
    }
}

pub struct ActionResponderAgradecimiento {
    localizer: Arc<ResponseLocalizer>,
}

impl ActionResponderAgradecimiento {
    pub fn new(localizer: Arc<ResponseLocalizer>) -> Self {
        Self { localizer }
    }
}

#[async_trait]
impl Action for ActionResponderAgradecimiento {
    fn name(&self) -> &'static str {
        "action_responder_agradecimiento"
    }

    async fn run(&self, dispatcher: &mut CollectingDispatcher, tracker: &Tracker) -> Vec<Event> {
        let text = self
            .localizer
            .localize_for(responses::THANKS_REPLY, tracker)
            .await;
        dispatcher.utter_message(text);
        Vec::new()
    }
}

pub struct ActionDespedida {
    localizer: Arc<ResponseLocalizer>,
}

impl ActionDespedida {
    pub fn new(localizer: Arc<ResponseLocalizer>) -> Self {
        Self { localizer }
    }
}

#[async_trait]
impl Action for ActionDespedida {
    fn name(&self) -> &'static str {
        "action_despedida"
    }

    async fn run(&self, dispatcher: &mut CollectingDispatcher, tracker: &Tracker) -> Vec<Event> {
        let goodbye = responses::GOODBYE.replace("{nombre}", user_name(tracker));
        let text = self.localizer.localize_for(&goodbye, tracker).await;
        dispatcher.utter_message(text);
        Vec::new()
    }
}
