//! Outbound translation: canned responses into the user's language.

use crate::conversation::ConversationState;
use crate::i18n::{LanguageCode, TranslationMetrics};
use crate::translation::{translate_or_fallback, TranslationOutcome, Translator};
use std::sync::Arc;

/// Translates reference-language responses into the user's language.
///
/// Fail-open: on any translation error the user gets the reference-language
/// text.
pub struct ResponseLocalizer {
    translator: Arc<dyn Translator>,
    reference_language: LanguageCode,
    metrics: Arc<TranslationMetrics>,
}

impl ResponseLocalizer {
    pub fn new(translator: Arc<dyn Translator>, reference_language: LanguageCode) -> Self {
        Self {
            translator,
            reference_language,
            metrics: Arc::new(TranslationMetrics::new()),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<TranslationMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn reference_language(&self) -> &LanguageCode {
        &self.reference_language
    }

    pub async fn localize_outcome(
        &self,
        text: &str,
        target_language: &LanguageCode,
    ) -> TranslationOutcome {
        translate_or_fallback(
            self.translator.as_ref(),
            &self.metrics,
            text,
            &self.reference_language,
            target_language,
        )
        .await
    }

    /// Translate reference-language `text` into `target_language`.
    pub async fn localize(&self, text: &str, target_language: &LanguageCode) -> String {
        self.localize_outcome(text, target_language)
            .await
            .into_text()
    }

    /// Localize `text` into the conversation's detected language, or leave it
    /// in the reference language when none is recorded.
    pub async fn localize_for(&self, text: &str, state: &(dyn ConversationState + Sync)) -> String {
        let target = state
            .detected_language()
            .unwrap_or_else(|| self.reference_language.clone());

        self.localize(text, &target).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::SlotMap;
    use crate::error::TranslationError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Translates one known sentence and fails on request.
    struct PhrasebookTranslator {
        fail: bool,
        calls: AtomicUsize,
    }

    impl PhrasebookTranslator {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                fail,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Translator for PhrasebookTranslator {
        async fn translate(
            &self,
            text: &str,
            source: Option<&LanguageCode>,
            dest: &LanguageCode,
        ) -> Result<String, TranslationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(source, Some(&LanguageCode::SPANISH));

            if self.fail {
                return Err(TranslationError::EmptyResponse);
            }
            match (text, dest.as_str()) {
                ("¡Hola! ¿Cómo te llamas?", "en") => Ok("Hello! What is your name?".to_string()),
                _ => Err(TranslationError::UnsupportedLanguage(dest.to_string())),
            }
        }

        fn name(&self) -> &str {
            "phrasebook"
        }
    }

    const GREETING: &str = "¡Hola! ¿Cómo te llamas?";

    #[tokio::test]
    async fn test_localize_translates_to_target() {
        let translator = PhrasebookTranslator::new(false);
        let localizer = ResponseLocalizer::new(translator.clone(), LanguageCode::SPANISH);

        let result = localizer.localize(GREETING, &LanguageCode::ENGLISH).await;

        assert_eq!(result, "Hello! What is your name?");
        assert_eq!(translator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_localize_failure_returns_spanish() {
        let translator = PhrasebookTranslator::new(true);
        let localizer = ResponseLocalizer::new(translator, LanguageCode::SPANISH);

        let outcome = localizer
            .localize_outcome(GREETING, &LanguageCode::ENGLISH)
            .await;

        assert!(outcome.is_fallback());
        assert_eq!(outcome.into_text(), GREETING);
    }

    #[tokio::test]
    async fn test_localize_to_reference_skips_service() {
        let translator = PhrasebookTranslator::new(false);
        let localizer = ResponseLocalizer::new(translator.clone(), LanguageCode::SPANISH);

        let result = localizer.localize(GREETING, &LanguageCode::SPANISH).await;

        assert_eq!(result, GREETING);
        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_localize_for_uses_detected_language_slot() {
        let translator = PhrasebookTranslator::new(false);
        let localizer = ResponseLocalizer::new(translator, LanguageCode::SPANISH);
        let mut state = SlotMap::new();
        state.set_detected_language(&LanguageCode::ENGLISH);

        let result = localizer.localize_for(GREETING, &state).await;

        assert_eq!(result, "Hello! What is your name?");
    }

    #[tokio::test]
    async fn test_localize_for_without_slot_stays_in_reference() {
        let translator = PhrasebookTranslator::new(false);
        let localizer = ResponseLocalizer::new(translator.clone(), LanguageCode::SPANISH);

        let result = localizer.localize_for(GREETING, &SlotMap::new()).await;

        assert_eq!(result, GREETING);
        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
    }
}
