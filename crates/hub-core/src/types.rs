use serde::{Deserialize, Serialize};

use crate::language::Language;

/// Raw, untyped search response
pub type SearchPayload = serde_json::Value;

/// One record pulled out of a payload, believed to be a dictionary entry
pub type RawCandidate = serde_json::Map<String, serde_json::Value>;

/// Canonical dictionary entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEntry {
    pub word: String,
    /// Reading for Japanese, phonetic symbols for English
    pub furigana: String,
    pub meaning: String,
    pub meaning_alternates: Vec<String>,
    pub example: String,
    /// Sanitized ruby markup, empty unless it carries a reading
    pub example_ruby: String,
    pub example_translation: String,
    pub source_url: String,
    pub audio_url: String,
}

impl NormalizedEntry {
    /// Identity of an entry within one result set
    pub fn dedup_key(&self) -> (String, String, String, String) {
        (
            self.word.clone(),
            self.furigana.clone(),
            self.meaning.clone(),
            self.example.clone(),
        )
    }

    /// Blank out fields that merely repeat the headword
    pub fn clear_redundant(&mut self) {
        if self.furigana == self.word {
            self.furigana.clear();
        }
        if self.meaning == self.word {
            self.meaning.clear();
        }
        if self.example == self.word {
            self.example.clear();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSet {
    pub query: String,
    pub corrected_query: String,
    /// Query whose payload produced `results`
    pub resolved_query: String,
    pub suggestions: Vec<String>,
    pub language: Language,
    pub source: String,
    pub results: Vec<NormalizedEntry>,
    /// Raw candidates found for the original query
    pub raw_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_serializes_camel_case() {
        let entry = NormalizedEntry {
            word: "猫".to_string(),
            example_ruby: "<ruby>猫<rt>ねこ</rt></ruby>".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["exampleRuby"], "<ruby>猫<rt>ねこ</rt></ruby>");
        assert!(json.get("meaningAlternates").unwrap().is_array());
    }

    #[test]
    fn test_clear_redundant() {
        let mut entry = NormalizedEntry {
            word: "ねこ".to_string(),
            furigana: "ねこ".to_string(),
            meaning: "고양이".to_string(),
            example: "ねこ".to_string(),
            ..Default::default()
        };
        entry.clear_redundant();
        assert_eq!(entry.furigana, "");
        assert_eq!(entry.meaning, "고양이");
        assert_eq!(entry.example, "");
    }
}
