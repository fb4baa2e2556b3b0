use crate::i18n::LanguageCode;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::str::FromStr;

/// Default translation endpoint (the public Google Translate web client API).
pub const DEFAULT_TRANSLATION_API_URL: &str = "https://translate.googleapis.com/translate_a/single";

/// Which language identification model to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelBackend {
    /// Trigram detector compiled into the binary, no model file
    Whatlang,
    /// fastText `lid.176` model loaded from `language_model_path`
    FastText,
}

impl FromStr for ModelBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "whatlang" => Ok(ModelBackend::Whatlang),
            "fasttext" => Ok(ModelBackend::FastText),
            other => bail!(
                "Unknown language model backend '{}' (expected 'whatlang' or 'fasttext')",
                other
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Environment
    pub environment: String,

    // Server
    pub port: u16,
    pub action_server_token: Option<String>,

    // Languages
    pub reference_language: LanguageCode,

    // Language identification
    pub language_model: ModelBackend,
    pub language_model_path: PathBuf,

    // Translation
    pub translation_api_url: String,
    pub translation_timeout_secs: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),

            // Server - 5055 is the conventional action server port
            port: match std::env::var("PORT") {
                Ok(v) => v.parse().context("PORT must be a valid port number")?,
                Err(_) => 5055,
            },
            action_server_token: std::env::var("ACTION_SERVER_TOKEN")
                .ok()
                .filter(|v| !v.is_empty()),

            // Languages
            reference_language: match std::env::var("REFERENCE_LANGUAGE") {
                Ok(v) => LanguageCode::parse(&v).context("REFERENCE_LANGUAGE is invalid")?,
                Err(_) => LanguageCode::SPANISH,
            },

            // Language identification
            language_model: match std::env::var("LANGUAGE_MODEL") {
                Ok(v) => v.parse().context("LANGUAGE_MODEL is invalid")?,
                Err(_) => ModelBackend::Whatlang,
            },
            language_model_path: std::env::var("LANGUAGE_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("lid.176.ftz")),

            // Translation
            translation_api_url: std::env::var("TRANSLATION_API_URL")
                .unwrap_or_else(|_| DEFAULT_TRANSLATION_API_URL.to_string()),
            translation_timeout_secs: match std::env::var("TRANSLATION_TIMEOUT_SECS") {
                Ok(v) => Some(
                    v.parse()
                        .context("TRANSLATION_TIMEOUT_SECS must be a whole number of seconds")?,
                ),
                Err(_) => None,
            },
        })
    }
}
