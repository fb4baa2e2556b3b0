//! Language registry: the languages the translation service accepts.
//!
//! Detection models and the translation service do not always agree on codes
//! (fastText says "zh" and "jv", the service wants "zh-cn" and "jw"). Each
//! entry maps a code we may receive to the code the service expects.

use crate::i18n::LanguageCode;
use std::sync::OnceLock;

/// A language known to the translation service.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// Code as produced by detection models or stored in conversation state
    pub code: &'static str,

    /// English name of the language
    pub name: &'static str,

    /// Code sent to the translation service
    pub service_code: &'static str,
}

/// Registry of translatable languages.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the language registry instance, initializing it on first use.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Look up a language by its exact code.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Resolve a language code to the code the translation service expects.
    ///
    /// Tries the full code first ("zh-tw"), then the primary subtag ("pt" for
    /// "pt-br"). Returns `None` when the service does not support the language.
    pub fn service_code(&self, code: &LanguageCode) -> Option<&'static str> {
        self.get_by_code(code.as_str())
            .or_else(|| self.get_by_code(code.primary()))
            .map(|lang| lang.service_code)
    }

    /// Check whether the translation service supports a language.
    pub fn is_supported(&self, code: &LanguageCode) -> bool {
        self.service_code(code).is_some()
    }

    /// English name for a language code, if known.
    pub fn name_of(&self, code: &LanguageCode) -> Option<&'static str> {
        self.get_by_code(code.as_str())
            .or_else(|| self.get_by_code(code.primary()))
            .map(|lang| lang.name)
    }

    pub fn list_all(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().collect()
    }
}

/// Languages accepted by the translation service, plus aliases for codes
/// emitted by language identification models.
fn default_languages() -> Vec<LanguageConfig> {
    const LANGUAGES: &[(&str, &str, &str)] = &[
        ("af", "Afrikaans", "af"),
        ("sq", "Albanian", "sq"),
        ("am", "Amharic", "am"),
        ("ar", "Arabic", "ar"),
        ("hy", "Armenian", "hy"),
        ("az", "Azerbaijani", "az"),
        ("eu", "Basque", "eu"),
        ("be", "Belarusian", "be"),
        ("bn", "Bengali", "bn"),
        ("bs", "Bosnian", "bs"),
        ("bg", "Bulgarian", "bg"),
        ("ca", "Catalan", "ca"),
        ("ceb", "Cebuano", "ceb"),
        ("ny", "Chichewa", "ny"),
        ("zh-cn", "Chinese (Simplified)", "zh-cn"),
        ("zh-tw", "Chinese (Traditional)", "zh-tw"),
        ("co", "Corsican", "co"),
        ("hr", "Croatian", "hr"),
        ("cs", "Czech", "cs"),
        ("da", "Danish", "da"),
        ("nl", "Dutch", "nl"),
        ("en", "English", "en"),
        ("eo", "Esperanto", "eo"),
        ("et", "Estonian", "et"),
        ("tl", "Filipino", "tl"),
        ("fi", "Finnish", "fi"),
        ("fr", "French", "fr"),
        ("fy", "Frisian", "fy"),
        ("gl", "Galician", "gl"),
        ("ka", "Georgian", "ka"),
        ("de", "German", "de"),
        ("el", "Greek", "el"),
        ("gu", "Gujarati", "gu"),
        ("ht", "Haitian Creole", "ht"),
        ("ha", "Hausa", "ha"),
        ("haw", "Hawaiian", "haw"),
        ("iw", "Hebrew", "iw"),
        ("he", "Hebrew", "iw"),
        ("hi", "Hindi", "hi"),
        ("hmn", "Hmong", "hmn"),
        ("hu", "Hungarian", "hu"),
        ("is", "Icelandic", "is"),
        ("ig", "Igbo", "ig"),
        ("id", "Indonesian", "id"),
        ("ga", "Irish", "ga"),
        ("it", "Italian", "it"),
        ("ja", "Japanese", "ja"),
        ("jw", "Javanese", "jw"),
        ("kn", "Kannada", "kn"),
        ("kk", "Kazakh", "kk"),
        ("km", "Khmer", "km"),
        ("ko", "Korean", "ko"),
        ("ku", "Kurdish", "ku"),
        ("ky", "Kyrgyz", "ky"),
        ("lo", "Lao", "lo"),
        ("la", "Latin", "la"),
        ("lv", "Latvian", "lv"),
        ("lt", "Lithuanian", "lt"),
        ("lb", "Luxembourgish", "lb"),
        ("mk", "Macedonian", "mk"),
        ("mg", "Malagasy", "mg"),
        ("ms", "Malay", "ms"),
        ("ml", "Malayalam", "ml"),
        ("mt", "Maltese", "mt"),
        ("mi", "Maori", "mi"),
        ("mr", "Marathi", "mr"),
        ("mn", "Mongolian", "mn"),
        ("my", "Myanmar (Burmese)", "my"),
        ("ne", "Nepali", "ne"),
        ("no", "Norwegian", "no"),
        ("or", "Odia", "or"),
        ("ps", "Pashto", "ps"),
        ("fa", "Persian", "fa"),
        ("pl", "Polish", "pl"),
        ("pt", "Portuguese", "pt"),
        ("pa", "Punjabi", "pa"),
        ("ro", "Romanian", "ro"),
        ("ru", "Russian", "ru"),
        ("sm", "Samoan", "sm"),
        ("gd", "Scots Gaelic", "gd"),
        ("sr", "Serbian", "sr"),
        ("st", "Sesotho", "st"),
        ("sn", "Shona", "sn"),
        ("sd", "Sindhi", "sd"),
        ("si", "Sinhala", "si"),
        ("sk", "Slovak", "sk"),
        ("sl", "Slovenian", "sl"),
        ("so", "Somali", "so"),
        ("es", "Spanish", "es"),
        ("su", "Sundanese", "su"),
        ("sw", "Swahili", "sw"),
        ("sv", "Swedish", "sv"),
        ("tg", "Tajik", "tg"),
        ("ta", "Tamil", "ta"),
        ("te", "Telugu", "te"),
        ("th", "Thai", "th"),
        ("tr", "Turkish", "tr"),
        ("uk", "Ukrainian", "uk"),
        ("ur", "Urdu", "ur"),
        ("ug", "Uyghur", "ug"),
        ("uz", "Uzbek", "uz"),
        ("vi", "Vietnamese", "vi"),
        ("cy", "Welsh", "cy"),
        ("xh", "Xhosa", "xh"),
        ("yi", "Yiddish", "yi"),
        ("yo", "Yoruba", "yo"),
        ("zu", "Zulu", "zu"),
        // Aliases for codes emitted by detection models
        ("zh", "Chinese (Simplified)", "zh-cn"),
        ("jv", "Javanese", "jw"),
        ("fil", "Filipino", "tl"),
        ("nb", "Norwegian", "no"),
        ("nn", "Norwegian", "no"),
    ];

    LANGUAGES
        .iter()
        .map(|&(code, name, service_code)| LanguageConfig {
            code,
            name,
            service_code,
        })
        .collect()
}
