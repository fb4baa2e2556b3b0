//! Canned bot responses, written in the reference language (Spanish).
//!
//! Actions localize these at send time. Placeholders in braces are filled
//! with `str::replace` before localizing.

/// Asks for the user's name
pub const ASK_NAME: &str = "¡Hola! ¿Cómo te llamas? 🙂";

/// Personalized greeting
/// Placeholders: {nombre}
pub const PERSONALIZED_GREETING: &str = "¡Genial, {nombre}! ¿Qué quieres hacer?";

/// Reply to a thank-you, offering another fun fact
pub const THANKS_REPLY: &str = "Gracias a ti, ¿quieres otro dato curioso? 😃";

/// Goodbye
/// Placeholders: {nombre}
pub const GOODBYE: &str = "¡Hasta pronto, {nombre}!";

/// Debug line uttered when the detected language is stored.
/// Placeholders: {idioma}
pub const LANGUAGE_DETECTED: &str = "Idioma detectado: {idioma}";

/// Used in place of the user's name when the slot is empty
pub const DEFAULT_USER_NAME: &str = "amigo";

/// Fun facts, one picked at random per request
pub const FUN_FACTS: &[&str] = &[
    "¿Sabías que la miel nunca se echa a perder? Se han encontrado vasijas de miel en tumbas egipcias que aún eran comestibles.",
    "El corazón de una ballena azul es tan grande que un humano podría nadar a través de sus arterias.",
    "Los pulpos tienen tres corazones y la sangre azul.",
    "Las abejas pueden reconocer rostros humanos.",
    "Australia es más ancha que la Luna. La Luna tiene 3400 km de diámetro, mientras que el diámetro de Australia de este a oeste es de casi 4000 km.",
    "En Suiza es ilegal tener una sola cobaya. Se considera maltrato animal porque son seres sociales y se sienten solos.",
];
