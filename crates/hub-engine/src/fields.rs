//! Key-path heuristics for payloads whose shape is unknown.
//!
//! A record is flattened into `(dotted key path, text)` pairs and each target field is
//! chosen by scoring key paths against a hint table. The tables and penalties below are
//! the whole policy.

use hub_core::RawCandidate;
use hub_core::text::clean_text;
use regex::Regex;
use serde_json::Value;

/// `(substring of a lower-cased key path, weight)`
pub type HintTable = &'static [(&'static str, i32)];

pub const WORD_HINTS: HintTable = &[
    ("entry", 3),
    ("headword", 3),
    ("source", 3),
    ("word", 3),
    ("title", 3),
    ("expentry", 3),
    ("handle", 3),
];

pub const READING_HINTS: HintTable = &[
    ("kana", 3),
    ("reading", 3),
    ("furigana", 3),
    ("phonetic", 3),
    ("pronounce", 3),
    ("symbol", 3),
];

pub const PRONUNCIATION_HINTS: HintTable = &[
    ("phonetic", 3),
    ("symbol", 3),
    ("pronounce", 3),
    ("ipa", 3),
    ("sound", 3),
    ("read", 3),
];

pub const MEANING_HINTS: HintTable = &[
    ("mean", 3),
    ("trans", 3),
    ("definition", 3),
    ("target", 3),
    ("korean", 3),
    ("desc", 3),
];

/// Used when no field carries Hangul
pub const MEANING_FALLBACK_HINTS: HintTable = &[
    ("mean", 3),
    ("trans", 3),
    ("definition", 3),
    ("target", 3),
    ("desc", 3),
];

pub const EXAMPLE_HINTS: HintTable = &[
    ("example", 3),
    ("sentence", 3),
    ("sample", 3),
    ("exam", 3),
    ("usage", 3),
];

const SHORT_TEXT_LEN: usize = 2;
const SHORT_TEXT_PENALTY: i32 = 2;
const LONG_TEXT_LEN: usize = 120;
const LONG_TEXT_PENALTY: i32 = 1;

/// Flatten every string leaf into `(dotted key path, cleaned text)`.
///
/// Sequences do not add a path segment, so all elements of a list share their parent's key.
/// Numbers, booleans and nulls carry no text, so ids and counts never win a pick.
pub fn flatten_fields(node: &Value) -> Vec<(String, String)> {
    let mut fields = Vec::new();
    walk_fields(node, "", &mut fields);
    fields
}

/// `flatten_fields` for a record, keys rooted at the record
pub fn flatten_record(record: &RawCandidate) -> Vec<(String, String)> {
    let mut fields = Vec::new();
    for (key, value) in record {
        walk_fields(value, key, &mut fields);
    }
    fields
}

fn walk_fields(node: &Value, parent_key: &str, out: &mut Vec<(String, String)>) {
    match node {
        Value::String(text) => out.push((parent_key.to_string(), clean_text(text))),
        Value::Array(items) => {
            for item in items {
                walk_fields(item, parent_key, out);
            }
        }
        Value::Object(map) => {
            for (key, value) in map {
                let nested_key = if parent_key.is_empty() {
                    key.clone()
                } else {
                    format!("{parent_key}.{key}")
                };
                walk_fields(value, &nested_key, out);
            }
        }
        Value::Number(_) | Value::Bool(_) | Value::Null => {}
    }
}

/// Sum of the weights of every hint found in the lower-cased key path
pub fn score_key(key: &str, hints: &[(&str, i32)]) -> i32 {
    let key = key.to_lowercase();
    hints
        .iter()
        .filter(|(hint, _)| key.contains(*hint))
        .map(|(_, weight)| weight)
        .sum()
}

/// Highest-scoring text among `fields`, optionally restricted to texts matching `pattern`.
///
/// Ties keep the earliest field. Returns an empty string when nothing scores above -1.
pub fn pick_best_text(
    fields: &[(String, String)],
    hints: &[(&str, i32)],
    pattern: Option<&Regex>,
) -> String {
    let mut best_text = "";
    let mut best_score = -1;

    for (key, value) in fields {
        if value.is_empty() {
            continue;
        }
        if let Some(pattern) = pattern
            && !pattern.is_match(value)
        {
            continue;
        }

        let mut score = score_key(key, hints);
        let len = value.chars().count();
        if len < SHORT_TEXT_LEN {
            score -= SHORT_TEXT_PENALTY;
        }
        if len > LONG_TEXT_LEN {
            score -= LONG_TEXT_PENALTY;
        }

        if score > best_score {
            best_score = score;
            best_text = value.as_str();
        }
    }

    best_text.to_string()
}

#[cfg(test)]
mod tests {
    use hub_core::language::{HANGUL, KANA};
    use serde_json::json;

    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_pick_respects_script_pattern() {
        let fields = fields(&[("entry.kana", "ねこ"), ("entry.title", "Neko")]);
        let hints: &[(&str, i32)] = &[("kana", 3), ("title", 3)];
        assert_eq!(pick_best_text(&fields, hints, Some(&*KANA)), "ねこ");
    }

    #[test]
    fn test_pick_ties_keep_first() {
        let fields = fields(&[("a.word", "first"), ("b.word", "second")]);
        assert_eq!(pick_best_text(&fields, WORD_HINTS, None), "first");
    }

    #[test]
    fn test_pick_penalties() {
        let long = "x".repeat(121);
        let fields = fields(&[("mean", long.as_str()), ("x", "ok"), ("y", "z")]);
        // Long text scores 3 - 1, short unrelated text -2 is never taken
        assert_eq!(pick_best_text(&fields, MEANING_HINTS, None), long);

        let only_short = self::fields(&[("x", "y")]);
        assert_eq!(pick_best_text(&only_short, MEANING_HINTS, None), "");
    }

    #[test]
    fn test_pick_without_match_is_empty() {
        let fields = fields(&[("meaning", "cat")]);
        assert_eq!(pick_best_text(&fields, MEANING_HINTS, Some(&*HANGUL)), "");
    }

    #[test]
    fn test_score_key_counts_every_hint() {
        assert_eq!(score_key("Entry.ExpEntry", WORD_HINTS), 6);
        assert_eq!(score_key("meansCollector.means.value", MEANING_HINTS), 3);
        assert_eq!(score_key("id", MEANING_HINTS), 0);
    }

    #[test]
    fn test_flatten_fields() {
        let value = json!({
            "entry": {"kana": "<b>ねこ</b>", "ids": [1, 2], "flag": true},
            "means": [{"value": "고양이"}, {"value": "괭이"}],
            "none": null
        });
        let flat = flatten_fields(&value);
        assert_eq!(
            flat,
            vec![
                ("entry.kana".to_string(), "ねこ".to_string()),
                ("means.value".to_string(), "고양이".to_string()),
                ("means.value".to_string(), "괭이".to_string()),
            ]
        );
    }
}
