//! Inbound translation: user text into the reference language.

use crate::i18n::{LanguageCode, TranslationMetrics};
use crate::translation::{translate_or_fallback, TranslationOutcome, Translator};
use std::sync::Arc;

/// Brings user text into the reference language before NLU.
///
/// Fail-open: if the translation service fails, NLU receives the original
/// text rather than nothing.
pub struct TextNormalizer {
    translator: Arc<dyn Translator>,
    reference_language: LanguageCode,
    metrics: Arc<TranslationMetrics>,
}

impl TextNormalizer {
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

    /// Translate `text` from `detected_language` into the reference language,
    /// reporting how the result was obtained.
    pub async fn normalize_outcome(
        &self,
        text: &str,
        detected_language: &LanguageCode,
    ) -> TranslationOutcome {
        translate_or_fallback(
            self.translator.as_ref(),
            &self.metrics,
            text,
            detected_language,
            &self.reference_language,
        )
        .await
    }

    /// Translate `text` into the reference language. Returns `text` unchanged
    /// when it is already in the reference language or translation fails.
    pub async fn normalize(&self, text: &str, detected_language: &LanguageCode) -> String {
        self.normalize_outcome(text, detected_language)
            .await
            .into_text()
    }
}
