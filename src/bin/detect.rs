//! Detect binary - runs detection and normalization on text from the command line
//!
//! Usage:
//!   cargo run --bin detect -- "What time does the library open?"
//!   cargo run --bin detect -- --localize en "¡Hola! ¿Cómo te llamas?"
//!
//! Uses the same environment variables as the server:
//! - REFERENCE_LANGUAGE (defaults to es)
//! - LANGUAGE_MODEL / LANGUAGE_MODEL_PATH (defaults to whatlang)
//! - TRANSLATION_API_URL, TRANSLATION_TIMEOUT_SECS

use anyhow::{bail, Context, Result};
use polyglot_bot::{
    config::Config,
    detection::{load_language_model, LanguageIdentifier},
    i18n::{LanguageCode, LanguageRegistry},
    localizer::ResponseLocalizer,
    normalizer::TextNormalizer,
    translation::{GoogleTranslateClient, TranslationOutcome, Translator},
};
use std::sync::Arc;
use tracing::info;

const USAGE: &str = "Usage: detect [--localize <lang>] <text>";

/// Split the command line into an optional localization target and the text.
fn parse_args(args: &[String]) -> Result<(Option<LanguageCode>, String)> {
    let (target, text) = match args {
        [flag, lang, rest @ ..] if flag == "--localize" && !rest.is_empty() => (
            Some(LanguageCode::parse(lang).context("Invalid --localize language")?),
            rest.join(" "),
        ),
        rest => (None, rest.join(" ")),
    };

    if text.trim().is_empty() {
        bail!(USAGE);
    }

    Ok((target, text))
}

fn describe(outcome: &TranslationOutcome) -> String {
    match outcome {
        TranslationOutcome::Unchanged(_) => "unchanged (already in target language)".to_string(),
        TranslationOutcome::Translated(_) => "translated".to_string(),
        TranslationOutcome::Fallback { error, .. } => format!("fallback ({})", error),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("polyglot_bot=warn".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (target, text) = parse_args(&args)?;

    let config = Config::from_env()?;
    let reference = config.reference_language.clone();
    let translator: Arc<dyn Translator> = Arc::new(GoogleTranslateClient::from_config(&config)?);

    if let Some(target) = target {
        let localizer = ResponseLocalizer::new(translator, reference.clone());
        let outcome = localizer.localize_outcome(&text, &target).await;

        println!("{} -> {}: {}", reference, target, describe(&outcome));
        println!("{}", outcome.text());
        return Ok(());
    }

    let model = load_language_model(&config)?;
    let identifier = LanguageIdentifier::new(model, reference.clone());
    info!("Using {} model", identifier.model_name());

    let language = identifier.identify(&text);
    let name = LanguageRegistry::get()
        .name_of(&language)
        .unwrap_or("unknown");
    println!("Detected language: {} ({})", language, name);

    let normalizer = TextNormalizer::new(translator, reference.clone());
    let outcome = normalizer.normalize_outcome(&text, &language).await;

    println!("{} -> {}: {}", language, reference, describe(&outcome));
    println!("{}", outcome.text());

    Ok(())
}
