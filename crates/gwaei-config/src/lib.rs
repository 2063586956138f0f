use std::env;

use serde::{Deserialize, Serialize};

/// When romaji input should be transliterated to kana before pattern
/// compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RomajiMode {
    Never,
    /// Only when the process locale is not Japanese
    NonJapaneseLocale,
    Always,
}

impl RomajiMode {
    fn from_env(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "never" => Some(RomajiMode::Never),
            "locale" => Some(RomajiMode::NonJapaneseLocale),
            "always" => Some(RomajiMode::Always),
            _ => None,
        }
    }

    /// Resolve the mode against the current locale
    pub fn enabled(&self, locale_is_japanese: bool) -> bool {
        match self {
            RomajiMode::Never => false,
            RomajiMode::NonJapaneseLocale => !locale_is_japanese,
            RomajiMode::Always => true,
        }
    }
}

/// Search preferences supplied by the settings collaborator. The engine
/// consumes these read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    pub romaji_mode: RomajiMode,
    /// Pure hiragana queries also match their katakana spelling
    pub hiragana_to_katakana: bool,
    /// Pure katakana queries also match their hiragana spelling
    pub katakana_to_hiragana: bool,
    /// Drain the medium/low queues at end of file
    pub show_less_relevant: bool,

    /// Medium-relevance queue cap for general dictionary searches.
    /// Kanji dictionary searches are uncapped; their result volume is
    /// bounded by the kanji set itself.
    pub max_medium_results: usize,
    /// Low-relevance queue cap for general dictionary searches
    pub max_low_results: usize,
    /// Lines processed per driver invocation
    pub chunk_size: usize,
}

impl Default for Preferences {
    fn default() -> Self {
        Self::new()
    }
}

impl Preferences {
    pub fn new() -> Self {
        let romaji_mode = env::var("GWAEI_ROMAJI_MODE")
            .ok()
            .and_then(|v| RomajiMode::from_env(&v))
            .unwrap_or(RomajiMode::NonJapaneseLocale);

        let max_medium_results = env::var("GWAEI_MAX_MEDIUM_RESULTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(100);

        let max_low_results = env::var("GWAEI_MAX_LOW_RESULTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(50);

        let chunk_size = env::var("GWAEI_CHUNK_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&n: &usize| n > 0)
            .unwrap_or(200);

        Preferences {
            romaji_mode,
            hiragana_to_katakana: true,
            katakana_to_hiragana: true,
            show_less_relevant: true,
            max_medium_results,
            max_low_results,
            chunk_size,
        }
    }
}
