//! Error types for language detection and translation.
//!
//! Only `ModelLoadError` is ever propagated to the host: a deployment with a
//! broken model must not start. Detection and translation errors are recovered
//! where they happen (see `LanguageIdentifier::identify` and
//! `TranslationOutcome::Fallback`).

use std::path::PathBuf;
use thiserror::Error;

/// The language classification model could not be loaded at startup.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("language model file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to load language model from {}: {reason}", .path.display())]
    Load { path: PathBuf, reason: String },

    #[error("language model backend '{0}' is not available in this build")]
    BackendUnavailable(String),
}

/// Language classification failed for a single message.
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("model returned no prediction")]
    NoPrediction,

    #[error("model returned an invalid language label: '{0}'")]
    InvalidLabel(String),

    #[error("model handle is unavailable (a previous prediction panicked)")]
    Poisoned,

    #[error("model prediction failed: {0}")]
    Model(String),
}

/// A call to the translation service failed.
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("unsupported language: '{0}'")]
    UnsupportedLanguage(String),

    #[error("translation request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("translation service error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("malformed translation response: {0}")]
    MalformedResponse(String),

    #[error("translation service returned an empty translation")]
    EmptyResponse,
}
