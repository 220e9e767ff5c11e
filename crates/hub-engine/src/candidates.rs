use std::collections::HashSet;

use hub_config::search::SearchConfig;
use hub_core::text::clean_text;
use serde_json::Value;
use url::form_urlencoded;

/// Section keys known to carry a corrected or echoed query, checked first
const SECTION_QUERY_KEYS: [&str; 8] = [
    "query",
    "queryRevert",
    "revert",
    "forceQuery",
    "spellQuery",
    "spellCheckedQuery",
    "correctedQuery",
    "suggestQuery",
];

/// Substrings of a lower-cased key that mark a suggested query anywhere in the payload
const QUERY_KEY_HINTS: [&str; 6] = ["query", "suggest", "correct", "spell", "revert", "recommend"];

/// Ordered, case-insensitively distinct query strings mined from one payload
struct CandidateCollector {
    original_key: String,
    max_count: usize,
    max_len: usize,
    seen: HashSet<String>,
    candidates: Vec<String>,
}

impl CandidateCollector {
    fn new(original_query: &str, config: &SearchConfig) -> Self {
        Self {
            original_key: clean_text(original_query).to_lowercase(),
            max_count: config.max_candidates,
            max_len: config.max_candidate_len,
            seen: HashSet::new(),
            candidates: Vec::new(),
        }
    }

    fn is_full(&self) -> bool {
        self.candidates.len() >= self.max_count
    }

    fn offer(&mut self, raw: &str) {
        if self.is_full() {
            return;
        }

        let text = normalize_candidate(raw);
        if text.is_empty() || text.chars().count() > self.max_len {
            return;
        }

        let key = text.to_lowercase();
        if key == self.original_key || !self.seen.insert(key) {
            return;
        }

        self.candidates.push(text);
    }

    fn offer_sections(&mut self, payload: &Value) {
        let Some(list_map) = payload
            .get("searchResultMap")
            .and_then(|map| map.get("searchResultListMap"))
            .and_then(Value::as_object)
        else {
            return;
        };

        for section in list_map.values().filter_map(Value::as_object) {
            for key in SECTION_QUERY_KEYS {
                if let Some(Value::String(text)) = section.get(key) {
                    self.offer(text);
                }
            }
        }
    }

    /// Scalars inside a list are judged by the list's key
    fn walk(&mut self, node: &Value, key: &str) {
        if self.is_full() {
            return;
        }

        match node {
            Value::Object(map) => {
                for (child_key, value) in map {
                    self.walk(value, &child_key.to_lowercase());
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.walk(item, key);
                }
            }
            Value::String(text) => {
                if QUERY_KEY_HINTS.iter().any(|hint| key.contains(*hint)) {
                    self.offer(text);
                }
            }
            Value::Number(_) | Value::Bool(_) | Value::Null => {}
        }
    }
}

/// Clean a candidate; serialized query strings are reduced to their `query` parameter
fn normalize_candidate(raw: &str) -> String {
    let text = clean_text(raw);

    let looks_serialized =
        text.contains('=') && (text.contains('&') || text.to_lowercase().starts_with("query="));
    if !looks_serialized {
        return text;
    }

    let query_string = text.split_once('?').map_or(text.as_str(), |(_, qs)| qs);
    let decoded = form_urlencoded::parse(query_string.as_bytes())
        .find(|(key, value)| key == "query" && !value.is_empty())
        .map(|(_, value)| clean_text(&value));
    decoded.unwrap_or(text)
}

/// Corrected or suggested queries found in `payload`, excluding `original_query`.
///
/// Known section keys come first, then every hinted key in document order.
pub fn collect_query_candidates(
    payload: &Value,
    original_query: &str,
    config: &SearchConfig,
) -> Vec<String> {
    let mut collector = CandidateCollector::new(original_query, config);
    collector.offer_sections(payload);
    collector.walk(payload, "");
    collector.candidates
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn collect(payload: &Value, query: &str) -> Vec<String> {
        collect_query_candidates(payload, query, &SearchConfig::default())
    }

    #[test]
    fn test_cap_order_and_original_excluded() {
        let mut map = serde_json::Map::new();
        map.insert("suggestQuery0".to_string(), json!("NEKO"));
        for i in 1..=10 {
            map.insert(format!("suggestQuery{i}"), json!(format!("cand{i}")));
        }
        let payload = Value::Object(map);

        let candidates = collect(&payload, "neko");
        assert_eq!(
            candidates,
            vec!["cand1", "cand2", "cand3", "cand4", "cand5", "cand6", "cand7", "cand8"]
        );
    }

    #[test]
    fn test_sections_come_first() {
        let payload = json!({
            "meta": {"recommendWord": "ねこじた"},
            "searchResultMap": {"searchResultListMap": {
                "WORD": {"query": "ねっこ", "spellQuery": "ねこ", "items": []}
            }}
        });
        assert_eq!(collect(&payload, "ねっこ"), vec!["ねこ", "ねこじた"]);
    }

    #[test]
    fn test_serialized_query_is_decoded() {
        let payload = json!({
            "revertLink": "query=%E3%81%AD%E3%81%93&range=word",
            "suggestUrl": "https://dict.naver.com/search?range=all&query=cat+food",
            "correction": "plain&amp;text"
        });
        assert_eq!(collect(&payload, "x"), vec!["ねこ", "cat food", "plain&text"]);
    }

    #[test]
    fn test_filters() {
        let long = "a".repeat(81);
        let payload = json!({
            "queryList": ["<b>Cat</b>", "cat", "", long, 5],
            "spelling": ["dog"],
            "nested": {"deep": "skipped"},
            "other": "ignored"
        });
        assert_eq!(collect(&payload, "x"), vec!["Cat", "dog"]);
    }
}
