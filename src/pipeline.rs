//! The language detection stage of the host's message pipeline.
//!
//! For each message: identify the language, annotate the message, normalize
//! its text into the reference language, and record the language in the
//! conversation state for the response actions.

use crate::conversation::ConversationState;
use crate::detection::LanguageIdentifier;
use crate::message::{Entity, Message};
use crate::normalizer::TextNormalizer;
use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

/// A non-trainable component in the host's message pipeline.
#[async_trait]
pub trait PipelineComponent: Send + Sync {
    fn name(&self) -> &str;

    /// Process a batch of messages in order, each to completion.
    async fn process(
        &self,
        messages: Vec<Message>,
        state: &mut (dyn ConversationState + Send),
    ) -> Vec<Message>;

    /// Persist learned state. Components without learned state do nothing.
    fn persist(&self) -> Result<()> {
        Ok(())
    }

    /// External packages the component needs at runtime.
    fn required_packages(&self) -> Vec<&'static str>;
}

/// Detects, annotates and normalizes the language of incoming messages.
pub struct LanguageDetectionComponent {
    identifier: LanguageIdentifier,
    normalizer: TextNormalizer,
}

impl LanguageDetectionComponent {
    pub const NAME: &'static str = "LanguageDetectionComponent";

    pub fn new(identifier: LanguageIdentifier, normalizer: TextNormalizer) -> Self {
        Self {
            identifier,
            normalizer,
        }
    }

    pub fn identifier(&self) -> &LanguageIdentifier {
        &self.identifier
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    /// Run the stage over one message.
    pub async fn process_message(
        &self,
        mut message: Message,
        state: &mut (dyn ConversationState + Send),
    ) -> Message {
        let text = match message.text.as_deref() {
            Some(text) if !text.trim().is_empty() => text.to_string(),
            _ => return message,
        };

        let language = self.identifier.identify(&text);
        debug!("Detected language '{}'", language);

        if message.raw_text.is_none() {
            message.raw_text = Some(text.clone());
        }
        message.detected_language = Some(language.clone());
        message
            .entities
            .push(Entity::detected_language(&language, Self::NAME));

        let normalized = self.normalizer.normalize(&text, &language).await;
        message.text = Some(normalized);

        state.set_detected_language(&language);

        message
    }
}

#[async_trait]
impl PipelineComponent for LanguageDetectionComponent {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn process(
        &self,
        messages: Vec<Message>,
        state: &mut (dyn ConversationState + Send),
    ) -> Vec<Message> {
        let mut processed = Vec::with_capacity(messages.len());
        for message in messages {
            processed.push(self.process_message(message, state).await);
        }
        processed
    }

    fn required_packages(&self) -> Vec<&'static str> {
        let mut packages = self.identifier.required_packages().to_vec();
        packages.push("reqwest");
        packages
    }
}
