use crate::config::Config;
use crate::error::TranslationError;
use crate::i18n::{LanguageCode, LanguageRegistry, TranslationMetrics};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// A machine translation service.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into `dest`. A `source` of `None` lets the service
    /// detect the source language.
    async fn translate(
        &self,
        text: &str,
        source: Option<&LanguageCode>,
        dest: &LanguageCode,
    ) -> Result<String, TranslationError>;

    fn name(&self) -> &str;
}

/// Result of a fail-open translation.
///
/// The public normalize/localize calls only ever hand back text; this keeps
/// the reason around so the fallback path can be logged and counted.
#[derive(Debug)]
pub enum TranslationOutcome {
    /// Source and target language were the same; no request was made
    Unchanged(String),
    /// The service returned a translation
    Translated(String),
    /// The service failed; `text` is the original, untranslated input
    Fallback {
        text: String,
        error: TranslationError,
    },
}

impl TranslationOutcome {
    pub fn text(&self) -> &str {
        match self {
            TranslationOutcome::Unchanged(text)
            | TranslationOutcome::Translated(text)
            | TranslationOutcome::Fallback { text, .. } => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            TranslationOutcome::Unchanged(text)
            | TranslationOutcome::Translated(text)
            | TranslationOutcome::Fallback { text, .. } => text,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, TranslationOutcome::Fallback { .. })
    }
}

/// Translate `text` from `source` to `dest`, returning the original text if
/// the service fails. Shared by the normalizer and the localizer.
pub(crate) async fn translate_or_fallback(
    translator: &dyn Translator,
    metrics: &TranslationMetrics,
    text: &str,
    source: &LanguageCode,
    dest: &LanguageCode,
) -> TranslationOutcome {
    if source == dest {
        metrics.record_short_circuit();
        return TranslationOutcome::Unchanged(text.to_string());
    }

    metrics.record_translation_request();

    match translator.translate(text, Some(source), dest).await {
        Ok(translated) => {
            debug!(
                "Translated {} -> {} via {} ({} chars)",
                source,
                dest,
                translator.name(),
                translated.chars().count()
            );
            TranslationOutcome::Translated(translated)
        }
        Err(error) => {
            metrics.record_translation_failure();
            warn!(
                "Translation {} -> {} via {} failed, keeping original text: {}",
                source,
                dest,
                translator.name(),
                error
            );
            TranslationOutcome::Fallback {
                text: text.to_string(),
                error,
            }
        }
    }
}

// ==================== Google Translate ====================

/// Client for the Google Translate web endpoint (`translate_a/single`).
pub struct GoogleTranslateClient {
    client: reqwest::Client,
    api_url: String,
}

impl GoogleTranslateClient {
    pub fn new(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
        }
    }

    /// Build a client from configuration. No timeout is applied unless
    /// `translation_timeout_secs` is set.
    pub fn from_config(config: &Config) -> Result<Self, TranslationError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.translation_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self::new(builder.build()?, config.translation_api_url.clone()))
    }
}

/// Resolve a language code to the one the service expects.
fn service_code(code: &LanguageCode) -> Result<&'static str, TranslationError> {
    LanguageRegistry::get()
        .service_code(code)
        .ok_or_else(|| TranslationError::UnsupportedLanguage(code.to_string()))
}

/// Extract the translated text from a `translate_a/single` response.
///
/// The response is a nested array; its first element lists segments of the
/// form `[translated, original, ...]`.
fn parse_translation_response(body: &Value) -> Result<String, TranslationError> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| {
            TranslationError::MalformedResponse("missing translation segments".to_string())
        })?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if translated.trim().is_empty() {
        return Err(TranslationError::EmptyResponse);
    }

    Ok(translated)
}

#[async_trait]
impl Translator for GoogleTranslateClient {
    async fn translate(
        &self,
        text: &str,
        source: Option<&LanguageCode>,
        dest: &LanguageCode,
    ) -> Result<String, TranslationError> {
        let source_code = match source {
            Some(code) => service_code(code)?,
            None => "auto",
        };
        let dest_code = service_code(dest)?;

        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("client", "gtx"),
                ("sl", source_code),
                ("tl", dest_code),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            return Err(TranslationError::Api { status, body });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| TranslationError::MalformedResponse(e.to_string()))?;

        parse_translation_response(&body)
    }

    fn name(&self) -> &str {
        "google-translate"
    }
}
