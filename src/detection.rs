//! Language identification.
//!
//! `LanguageIdentifier` wraps a pretrained classification model behind the
//! `LanguageModel` trait and never fails: a model error degrades to the
//! reference language.

use crate::config::{Config, ModelBackend};
use crate::error::{DetectionError, ModelLoadError};
use crate::i18n::{LanguageCode, TranslationMetrics};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};

/// Prefix fastText puts in front of every label ("__label__en").
pub const LABEL_PREFIX: &str = "__label__";

/// One scored label returned by a language model.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub score: f32,
}

/// A pretrained language classification model.
///
/// Implementations are not required to be `Sync`; `LanguageIdentifier`
/// serializes access to the model.
pub trait LanguageModel: Send {
    /// Return up to `k` predictions for `text`.
    fn predict(&self, text: &str, k: usize) -> Result<Vec<Prediction>, DetectionError>;

    fn name(&self) -> &'static str;

    /// External packages the model depends on.
    fn required_packages(&self) -> &'static [&'static str];
}

// ==================== Whatlang ====================

/// Trigram-based detector that needs no model file.
pub struct WhatlangModel {
    detector: whatlang::Detector,
}

impl WhatlangModel {
    pub fn new() -> Self {
        Self {
            detector: whatlang::Detector::new(),
        }
    }
}

impl Default for WhatlangModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a whatlang language (ISO 639-3) to an ISO 639-1 code where one exists.
fn whatlang_code(lang: whatlang::Lang) -> &'static str {
    match lang {
        // Mandarin has no 639-1 code of its own
        whatlang::Lang::Cmn => "zh",
        other => isolang::Language::from_639_3(other.code())
            .and_then(|l| l.to_639_1())
            .unwrap_or_else(|| other.code()),
    }
}

impl LanguageModel for WhatlangModel {
    fn predict(&self, text: &str, _k: usize) -> Result<Vec<Prediction>, DetectionError> {
        Ok(self
            .detector
            .detect(text)
            .map(|info| Prediction {
                label: whatlang_code(info.lang()).to_string(),
                score: info.confidence() as f32,
            })
            .into_iter()
            .collect())
    }

    fn name(&self) -> &'static str {
        "whatlang"
    }

    fn required_packages(&self) -> &'static [&'static str] {
        &["whatlang", "isolang"]
    }
}

// ==================== fastText ====================

/// fastText language identification model (`lid.176.bin` / `lid.176.ftz`).
#[cfg(feature = "fasttext")]
pub struct FastTextModel {
    inner: fasttext::FastText,
}

#[cfg(feature = "fasttext")]
impl FastTextModel {
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        let path_str = path.to_str().ok_or_else(|| ModelLoadError::Load {
            path: path.to_path_buf(),
            reason: "path is not valid UTF-8".to_string(),
        })?;

        let mut inner = fasttext::FastText::new();
        inner
            .load_model(path_str)
            .map_err(|reason| ModelLoadError::Load {
                path: path.to_path_buf(),
                reason,
            })?;

        Ok(Self { inner })
    }
}

#[cfg(feature = "fasttext")]
impl LanguageModel for FastTextModel {
    fn predict(&self, text: &str, k: usize) -> Result<Vec<Prediction>, DetectionError> {
        // fastText predicts one line at a time
        let line = text.replace(['\n', '\r'], " ");

        let predictions = self
            .inner
            .predict(&line, k as i32, 0.0)
            .map_err(DetectionError::Model)?;

        Ok(predictions
            .into_iter()
            .map(|p| Prediction {
                label: p.label,
                score: p.prob,
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "fasttext"
    }

    fn required_packages(&self) -> &'static [&'static str] {
        &["fasttext"]
    }
}

#[cfg(feature = "fasttext")]
fn load_fasttext(path: &Path) -> Result<Box<dyn LanguageModel>, ModelLoadError> {
    Ok(Box::new(FastTextModel::load(path)?))
}

#[cfg(not(feature = "fasttext"))]
fn load_fasttext(_path: &Path) -> Result<Box<dyn LanguageModel>, ModelLoadError> {
    Err(ModelLoadError::BackendUnavailable("fasttext".to_string()))
}

/// Load the language model selected in the configuration.
///
/// Errors here are fatal: the caller should refuse to start.
pub fn load_language_model(config: &Config) -> Result<Box<dyn LanguageModel>, ModelLoadError> {
    let result = match config.language_model {
        ModelBackend::Whatlang => Ok(Box::new(WhatlangModel::new()) as Box<dyn LanguageModel>),
        ModelBackend::FastText => {
            let path = config.language_model_path.as_path();
            if !path.exists() {
                Err(ModelLoadError::NotFound(path.to_path_buf()))
            } else {
                load_fasttext(path)
            }
        }
    };

    match &result {
        Ok(model) => info!("Loaded language model: {}", model.name()),
        Err(e) => error!("Could not load language model: {}", e),
    }

    result
}

// ==================== Identifier ====================

/// Strip the model label prefix and validate what remains as a language code.
pub fn parse_label(label: &str) -> Result<LanguageCode, DetectionError> {
    let bare = label.strip_prefix(LABEL_PREFIX).unwrap_or(label);
    LanguageCode::parse(bare).map_err(|_| DetectionError::InvalidLabel(label.to_string()))
}

/// Classifies the language of free text.
pub struct LanguageIdentifier {
    model: Mutex<Box<dyn LanguageModel>>,
    model_name: &'static str,
    required_packages: &'static [&'static str],
    reference_language: LanguageCode,
    metrics: Arc<TranslationMetrics>,
}

impl LanguageIdentifier {
    pub fn new(model: Box<dyn LanguageModel>, reference_language: LanguageCode) -> Self {
        Self {
            model_name: model.name(),
            required_packages: model.required_packages(),
            model: Mutex::new(model),
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

    pub fn model_name(&self) -> &'static str {
        self.model_name
    }

    pub fn required_packages(&self) -> &'static [&'static str] {
        self.required_packages
    }

    /// Classify `text`, reporting failures instead of defaulting.
    pub fn try_identify(&self, text: &str) -> Result<LanguageCode, DetectionError> {
        let predictions = {
            let model = self.model.lock().map_err(|_| DetectionError::Poisoned)?;
            panic::catch_unwind(AssertUnwindSafe(|| model.predict(text, 1)))
                .map_err(|_| DetectionError::Model("model panicked during prediction".to_string()))??
        };

        let top = predictions
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .ok_or(DetectionError::NoPrediction)?;

        debug!(
            "Top language prediction from {}: {} ({:.3})",
            self.model_name, top.label, top.score
        );

        parse_label(&top.label)
    }

    /// Classify `text`, falling back to the reference language on any error.
    ///
    /// Callers must not pass empty text.
    pub fn identify(&self, text: &str) -> LanguageCode {
        self.metrics.record_detection();

        match self.try_identify(text) {
            Ok(code) => code,
            Err(e) => {
                warn!(
                    "Language detection failed, defaulting to '{}': {}",
                    self.reference_language, e
                );
                self.metrics.record_detection_fallback();
                self.reference_language.clone()
            }
        }
    }
}
