use hub_core::{Language, RawCandidate};
use regex::Regex;
use serde_json::Value;

use crate::fields::flatten_record;

/// Key-path substrings marking a record as carrying a meaning
const MEANING_KEY_HINTS: [&str; 5] = ["mean", "trans", "target", "desc", "example"];

/// Records under `searchResultMap.searchResultListMap.<section>[.items]`.
///
/// A missing or malformed path yields nothing.
pub fn extract_direct_items(payload: &Value) -> Vec<&RawCandidate> {
    let Some(list_map) = payload
        .get("searchResultMap")
        .and_then(|map| map.get("searchResultListMap"))
        .and_then(Value::as_object)
    else {
        return Vec::new();
    };

    list_map
        .values()
        .filter_map(|section| match section {
            Value::Object(section) => section.get("items").and_then(Value::as_array),
            Value::Array(items) => Some(items),
            _ => None,
        })
        .flatten()
        .filter_map(Value::as_object)
        .collect()
}

/// Walk the whole payload for lists of entry-like records.
///
/// A list qualifies when every element is a mapping with some text in the language's script
/// and some key path hinting at a meaning. Every nested value is visited regardless, so
/// several disjoint lists can be found.
pub fn extract_generic_items(payload: &Value, language: Language) -> Vec<&RawCandidate> {
    let mut items = Vec::new();
    mine(payload, language.word_pattern(), &mut items);
    items
}

fn mine<'a>(node: &'a Value, word_pattern: &Regex, out: &mut Vec<&'a RawCandidate>) {
    match node {
        Value::Array(elements) => {
            let records: Vec<&RawCandidate> =
                elements.iter().filter_map(Value::as_object).collect();

            if !records.is_empty()
                && records.len() == elements.len()
                && records
                    .iter()
                    .all(|record| looks_like_entry(record, word_pattern))
            {
                out.extend(records);
            }

            for element in elements {
                mine(element, word_pattern, out);
            }
        }
        Value::Object(map) => {
            for value in map.values() {
                mine(value, word_pattern, out);
            }
        }
        Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => {}
    }
}

fn looks_like_entry(record: &RawCandidate, word_pattern: &Regex) -> bool {
    let fields = flatten_record(record);

    let has_word = fields.iter().any(|(_, text)| word_pattern.is_match(text));
    let has_meaning = fields.iter().any(|(key, _)| {
        let key = key.to_lowercase();
        MEANING_KEY_HINTS.iter().any(|hint| key.contains(*hint))
    });

    has_word && has_meaning
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_direct_items_from_sections() {
        let payload = json!({
            "searchResultMap": {"searchResultListMap": {
                "WORD": {"items": [{"expEntry": "a"}, "junk", {"expEntry": "b"}]},
                "MEANING": [{"expEntry": "c"}],
                "EXAMPLE": {"total": 0},
                "OTHER": "x"
            }}
        });
        let items = extract_direct_items(&payload);
        let words: Vec<&str> = items
            .iter()
            .filter_map(|item| item.get("expEntry").and_then(Value::as_str))
            .collect();
        assert_eq!(words, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_direct_items_malformed() {
        assert!(extract_direct_items(&json!([1, 2])).is_empty());
        assert!(extract_direct_items(&json!({"searchResultMap": []})).is_empty());
        assert!(extract_direct_items(&json!({"searchResultMap": {"searchResultListMap": 3}})).is_empty());
    }

    #[test]
    fn test_generic_items_require_every_element() {
        let payload = json!({
            "data": {
                "good": [
                    {"title": "猫", "meaning": "고양이"},
                    {"title": "犬", "detail": {"translation": "개"}}
                ],
                "mixed": [
                    {"title": "鳥", "meaning": "새"},
                    {"title": "bird", "meaning": "새"}
                ],
                "nested": {"deeper": [{"head": "魚", "desc": "물고기"}]}
            }
        });
        let items = extract_generic_items(&payload, Language::Ja);
        let titles: Vec<String> = items
            .iter()
            .map(|item| {
                item.get("title")
                    .or_else(|| item.get("head"))
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            })
            .collect();
        assert_eq!(titles, vec!["猫", "犬", "魚"]);
    }

    #[test]
    fn test_generic_items_need_textual_meaning() {
        let payload = json!({"rows": [{"title": "猫", "meaningId": 3}]});
        assert!(extract_generic_items(&payload, Language::Ja).is_empty());
    }

    #[test]
    fn test_generic_items_language_script() {
        let payload = json!({"rows": [{"word": "impairment", "meanValue": "손상"}]});
        assert_eq!(extract_generic_items(&payload, Language::En).len(), 1);
        assert!(extract_generic_items(&payload, Language::Ja).is_empty());
    }
}
