//! Language codes, the translation service's language table, and metrics.
//!
//! # Architecture
//!
//! - `language`: Validated `LanguageCode` type shared by detection and translation
//! - `registry`: Languages the translation service accepts, with code aliases
//! - `metrics`: Detection and translation counters
//!
//! # Example
//!
//! ```rust,ignore
//! use polyglot_bot::i18n::{LanguageCode, LanguageRegistry};
//!
//! let english = LanguageCode::parse("en")?;
//! assert!(LanguageRegistry::get().is_supported(&english));
//! ```

mod language;
mod metrics;
mod registry;

pub use language::LanguageCode;
pub use metrics::{MetricsReport, TranslationMetrics};
pub use registry::{LanguageConfig, LanguageRegistry};
