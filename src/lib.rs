//! Language detection, normalization and response localization for a
//! Spanish-first chatbot.
//!
//! Incoming messages are classified by language, tagged, and translated into
//! the reference language before NLU. Canned responses are translated back
//! into the user's language when custom actions answer. Translation failures
//! never reach the user: the untranslated text is used instead.

pub mod actions;
pub mod config;
pub mod conversation;
pub mod detection;
pub mod error;
pub mod i18n;
pub mod localizer;
pub mod message;
pub mod normalizer;
pub mod pipeline;
pub mod security;
pub mod server;
pub mod translation;
