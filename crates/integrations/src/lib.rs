//! HTTP clients for the hosted services behind the authoring workflow.
//!
//! Each client implements one of the service traits from
//! [`blogcraft_core::services`] using [`reqwest`]:
//!
//! - [`gemini::GeminiApi`] -> `TextGenerator`
//! - [`languagetool::LanguageToolApi`] -> `GrammarChecker`
//! - [`airtable::AirtableApi`] -> `RecordStore`
//! - [`wordpress::WordPressApi`] -> `BlogPlatform`

pub mod airtable;
pub mod error;
pub mod gemini;
pub mod languagetool;
pub mod wordpress;

#[cfg(test)]
pub(crate) mod test_server;

/// Read a required environment variable, panicking with a clear message.
pub(crate) fn required_env(name: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| panic!("{name} must be set"))
}

/// Read an optional environment variable with a default.
pub(crate) fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}
