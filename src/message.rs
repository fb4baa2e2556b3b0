//! Messages flowing through the host's NLU pipeline.

use crate::i18n::LanguageCode;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Entity kind used for the detected-language annotation.
pub const DETECTED_LANGUAGE_ENTITY: &str = "detected_language";

/// An annotation describing something found in a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub entity: String,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Character offsets into the text. Absent for annotations that describe
    /// the message as a whole.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,
    /// Component that produced the annotation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extractor: Option<String>,

    /// Extractor-specific attributes (`role`, `group`, `processors`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity {
    /// The detected-language annotation. Confidence is always 1.0.
    pub fn detected_language(language: &LanguageCode, extractor: &str) -> Self {
        Self {
            entity: DETECTED_LANGUAGE_ENTITY.to_string(),
            value: Value::String(language.to_string()),
            confidence: Some(1.0),
            start: None,
            end: None,
            extractor: Some(extractor.to_string()),
            extra: Map::new(),
        }
    }
}

/// A unit of conversational input.
///
/// Attributes this crate does not know about are kept in `extra` and
/// serialized back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Working text; replaced with the normalized text during processing
    #[serde(default)]
    pub text: Option<String>,

    /// Text exactly as the user sent it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,

    /// Unusable codes from the host are dropped rather than failing the
    /// whole payload.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_language"
    )]
    pub detected_language: Option<LanguageCode>,

    #[serde(default)]
    pub entities: Vec<Entity>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn lenient_language<'de, D>(deserializer: D) -> Result<Option<LanguageCode>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(Value::Null) => None,
        Some(Value::String(code)) => match LanguageCode::parse(&code) {
            Ok(language) => Some(language),
            Err(e) => {
                warn!("Ignoring detected_language from host: {}", e);
                None
            }
        },
        Some(other) => {
            warn!("Ignoring non-string detected_language from host: {}", other);
            None
        }
    })
}

impl Message {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            raw_text: Some(text.clone()),
            text: Some(text),
            ..Default::default()
        }
    }

    /// Entities of a given kind.
    pub fn entities_of<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Entity> + 'a {
        self.entities.iter().filter(move |e| e.entity == kind)
    }
}
