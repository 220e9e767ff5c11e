//! Normalization of client-supplied saved state.
//!
//! Output of `sanitize_state` is a fixpoint: serializing it and sanitizing again yields the
//! same value, because every text goes through the stable cleaners.

use std::hash::Hasher;

use hub_core::text::{clean_text_stable, has_reading_annotation, sanitize_ruby_html_stable};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use twox_hash::XxHash64;

const MAX_LISTS: usize = 200;
const MAX_HISTORY: usize = 1000;
const MAX_BAD_EXAMPLES: usize = 20;
const MAX_USER_NAME_LEN: usize = 24;
const HISTORY_ID_HEX_LEN: usize = 12;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedState {
    pub lists: Vec<WordList>,
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordList {
    pub id: String,
    pub name: String,
    pub words: Vec<WordEntry>,
}

/// A saved card
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordEntry {
    pub word: String,
    pub furigana: String,
    pub meaning: String,
    pub example: String,
    pub example_ruby: String,
    pub example_translation: String,
    pub source_url: String,
    pub audio_url: String,
    pub example_pinned: bool,
    pub bad_examples: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub query: String,
    pub created_at: String,
}

/// Keep the well-formed parts of an arbitrary state document
pub fn sanitize_state(payload: &Value) -> SavedState {
    let Value::Object(payload) = payload else {
        return SavedState::default();
    };

    let mut lists = Vec::new();
    for row in array_field(payload, "lists") {
        if let Some(list) = sanitize_list(row) {
            lists.push(list);
        }
        if lists.len() >= MAX_LISTS {
            break;
        }
    }

    let mut history = Vec::new();
    for row in array_field(payload, "history") {
        if let Some(entry) = sanitize_history_entry(row) {
            history.push(entry);
        }
        if history.len() >= MAX_HISTORY {
            break;
        }
    }

    SavedState { lists, history }
}

/// Cleaned display name, empty when nothing usable remains
pub fn sanitize_user_name(raw: &str) -> String {
    let name = clean_text_stable(raw);
    if name.chars().count() <= MAX_USER_NAME_LEN {
        return name;
    }
    name.chars()
        .take(MAX_USER_NAME_LEN)
        .collect::<String>()
        .trim()
        .to_string()
}

fn sanitize_list(raw: &Value) -> Option<WordList> {
    let Value::Object(row) = raw else {
        return None;
    };

    let id = text_field(row, "id");
    let name = text_field(row, "name");
    if id.is_empty() || name.is_empty() {
        return None;
    }

    let words = array_field(row, "words")
        .filter_map(sanitize_word_entry)
        .collect();

    Some(WordList { id, name, words })
}

fn sanitize_word_entry(raw: &Value) -> Option<WordEntry> {
    let Value::Object(row) = raw else {
        return None;
    };

    let word = text_field(row, "word");
    if word.is_empty() {
        return None;
    }

    let mut example_ruby = sanitize_ruby_html_stable(&raw_text(row.get("exampleRuby")));
    if !has_reading_annotation(&example_ruby) {
        example_ruby.clear();
    }

    let bad_examples = array_field(row, "badExamples")
        .map(|value| clean_text_stable(&raw_text(Some(value))))
        .filter(|text| !text.is_empty())
        .take(MAX_BAD_EXAMPLES)
        .collect();

    Some(WordEntry {
        word,
        furigana: text_field(row, "furigana"),
        meaning: text_field(row, "meaning"),
        example: text_field(row, "example"),
        example_ruby,
        example_translation: text_field(row, "exampleTranslation"),
        source_url: text_field(row, "sourceUrl"),
        audio_url: text_field(row, "audioUrl"),
        example_pinned: row.get("examplePinned").is_some_and(is_truthy),
        bad_examples,
    })
}

/// Plain query strings and legacy word cards both become history rows
fn sanitize_history_entry(raw: &Value) -> Option<HistoryEntry> {
    match raw {
        Value::String(text) => {
            let query = clean_text_stable(text);
            if query.is_empty() {
                return None;
            }
            Some(HistoryEntry {
                id: history_id(&query),
                query,
                created_at: String::new(),
            })
        }
        Value::Object(row) => {
            let mut query = text_field(row, "query");
            if query.is_empty() {
                query = text_field(row, "word");
            }
            if query.is_empty() {
                return None;
            }

            let created_at = text_field(row, "createdAt");
            let mut id = text_field(row, "id");
            if id.is_empty() {
                id = history_id(&format!("{query}|{created_at}"));
            }
            Some(HistoryEntry {
                id,
                query,
                created_at,
            })
        }
        Value::Array(_) | Value::Number(_) | Value::Bool(_) | Value::Null => None,
    }
}

/// Deterministic `h_<hex>` id for rows stored without one
fn history_id(seed: &str) -> String {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(seed.as_bytes());
    let hex = format!("{:016x}", hasher.finish());
    format!("h_{}", &hex[..HISTORY_ID_HEX_LEN])
}

fn array_field<'a>(row: &'a Map<String, Value>, key: &str) -> impl Iterator<Item = &'a Value> {
    row.get(key).and_then(Value::as_array).into_iter().flatten()
}

fn text_field(row: &Map<String, Value>, key: &str) -> String {
    clean_text_stable(&raw_text(row.get(key)))
}

/// String form of a scalar; containers, null and false carry no text
fn raw_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(true)) => "true".to_string(),
        _ => String::new(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
