// Application configuration.
// Loads the persisted display language and the GitHub account to showcase.

#![allow(dead_code)]

use std::fs;

use crate::cache::paths;
use crate::i18n::Language;

/// GitHub account whose repositories the Projects tab shows.
const DEFAULT_GITHUB_USER: &str = "orsinialberto";

#[derive(Debug, Clone)]
pub struct Config {
    pub language: Language,
    pub github_user: String,
    pub github_token: Option<String>,
}

impl Config {
    /// Load configuration from the environment and persisted settings.
    pub fn load() -> Self {
        Self {
            language: load_language(),
            github_user: std::env::var("FOLIO_GITHUB_USER")
                .unwrap_or_else(|_| DEFAULT_GITHUB_USER.to_string()),
            github_token: std::env::var("GITHUB_TOKEN").ok(),
        }
    }
}

/// Read the persisted display language, defaulting to Italian.
fn load_language() -> Language {
    paths::language_path()
        .and_then(|path| fs::read_to_string(path).ok())
        .and_then(|code| Language::from_code(&code))
        .unwrap_or_default()
}

/// Persist the display language. Best-effort: a failed write only costs the
/// preference on the next start.
pub fn save_language(language: Language) {
    let Some(path) = paths::language_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let _ = fs::write(path, language.code());
}
