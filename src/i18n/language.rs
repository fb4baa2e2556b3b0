//! Language code type: validated, normalized language identifiers.
//!
//! Detection models and translation services both speak in short codes
//! ("es", "en", "zh-cn"). `LanguageCode` is the one representation used
//! between them, so comparisons against the reference language are exact.

use anyhow::{bail, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// A validated language code.
///
/// Codes are lowercase, trimmed, and use `-` as the region separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageCode(Cow<'static, str>);

static CODE_REGEX: OnceLock<Regex> = OnceLock::new();

fn code_regex() -> &'static Regex {
    CODE_REGEX.get_or_init(|| {
        Regex::new(r"^[a-z]{2,3}(-[a-z0-9]{2,4})?$").expect("language code regex is valid")
    })
}

impl LanguageCode {
    /// Spanish, the default reference language.
    pub const SPANISH: LanguageCode = LanguageCode(Cow::Borrowed("es"));

    pub const ENGLISH: LanguageCode = LanguageCode(Cow::Borrowed("en"));

    /// Parse and normalize a language code.
    ///
    /// # Example
    /// ```ignore
    /// let code = LanguageCode::parse(" PT_br ")?;
    /// assert_eq!(code.as_str(), "pt-br");
    /// ```
    pub fn parse(code: &str) -> Result<LanguageCode> {
        let normalized = code.trim().to_ascii_lowercase().replace('_', "-");

        if normalized.is_empty() {
            bail!("Empty language code");
        }
        if !code_regex().is_match(&normalized) {
            bail!("Invalid language code: '{}'", code);
        }

        Ok(LanguageCode(Cow::Owned(normalized)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The primary subtag, without region ("zh" for "zh-cn").
    pub fn primary(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }
}

impl FromStr for LanguageCode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        LanguageCode::parse(s)
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        LanguageCode::parse(&value)
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.0.into_owned()
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
