use std::fmt;

use hub_config::ProviderConfig;
use hub_config::network::NetworkConfig;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// Hiragana, katakana and CJK ideographs
    pub static ref JAPANESE: Regex = Regex::new(r"[\x{3040}-\x{30FF}\x{3400}-\x{9FFF}]").unwrap();
    pub static ref KANA: Regex = Regex::new(r"[\x{3040}-\x{30FF}]").unwrap();
    /// Precomposed Hangul syllables
    pub static ref HANGUL: Regex = Regex::new(r"[\x{AC00}-\x{D7A3}]").unwrap();
    pub static ref LATIN: Regex = Regex::new(r"[A-Za-z]").unwrap();
}

/// Source language of a lookup; the target is always Korean
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Ja,
    En,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Ja => "ja",
            Language::En => "en",
        }
    }

    /// Parse an ISO 639-1 code, ignoring case and surrounding whitespace
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "ja" => Some(Language::Ja),
            "en" => Some(Language::En),
            _ => None,
        }
    }

    /// Pattern a headword must match
    pub fn word_pattern(&self) -> &'static Regex {
        match self {
            Language::Ja => &JAPANESE,
            Language::En => &LATIN,
        }
    }

    pub fn provider<'a>(&self, network: &'a NetworkConfig) -> &'a ProviderConfig {
        match self {
            Language::Ja => &network.ja,
            Language::En => &network.en,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Guess the language of a query from its script. Defaults to Japanese.
pub fn detect_language(query: &str) -> Language {
    if JAPANESE.is_match(query) {
        Language::Ja
    } else if LATIN.is_match(query) {
        Language::En
    } else {
        Language::Ja
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_language() {
        assert_eq!(detect_language("猫"), Language::Ja);
        assert_eq!(detect_language("ねこ cat"), Language::Ja);
        assert_eq!(detect_language("impairment"), Language::En);
        assert_eq!(detect_language("고양이"), Language::Ja);
        assert_eq!(detect_language(""), Language::Ja);
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Language::from_code(" EN "), Some(Language::En));
        assert_eq!(Language::from_code("ko"), None);
    }
}
