use hub_core::text::clean_text;
use hub_core::{NormalizedEntry, RawCandidate};
use serde_json::Value;

const AUDIO_KEY_HINTS: [&str; 7] = [
    "audio",
    "sound",
    "voice",
    "tts",
    "pronounce",
    "pronunciation",
    "mp3",
];

const AUDIO_URL_HINTS: [&str; 7] = [".mp3", ".m4a", ".wav", ".ogg", "audio", "sound", "tts"];

/// Decorative separators ignored when matching words
const KEY_SEPARATORS: [char; 3] = ['\u{30FB}', '\u{00B7}', '\u{FF65}'];

const EXACT_MATCH: i32 = 100;
const CONTAINED_MATCH: i32 = 80;
const QUERY_MATCH: i32 = 65;
/// Lowest score a donor needs to lend its audio
pub const MIN_DONOR_SCORE: i32 = QUERY_MATCH;

/// Absolute URL for a media reference, `None` when it is not a URL
pub fn normalize_media_url(value: &str, media_root: &str) -> Option<String> {
    let text = value.trim();
    if text.is_empty() {
        return None;
    }
    if let Some(rest) = text.strip_prefix("//") {
        return Some(format!("https://{rest}"));
    }
    if text.starts_with('/') {
        return Some(format!("{}{text}", media_root.trim_end_matches('/')));
    }
    if text.starts_with("http://") || text.starts_with("https://") {
        return Some(text.to_string());
    }
    None
}

/// First URL in the record that looks like pronunciation audio, by key or by extension
pub fn extract_audio_url(record: &RawCandidate, media_root: &str) -> String {
    record
        .iter()
        .find_map(|(key, value)| find_audio(value, &key.to_lowercase(), media_root))
        .unwrap_or_default()
}

fn find_audio(node: &Value, key: &str, media_root: &str) -> Option<String> {
    match node {
        Value::Object(map) => map
            .iter()
            .find_map(|(key, value)| find_audio(value, &key.to_lowercase(), media_root)),
        Value::Array(items) => items
            .iter()
            .find_map(|item| find_audio(item, key, media_root)),
        Value::String(text) => {
            let url = normalize_media_url(text, media_root)?;
            let url_lower = url.to_lowercase();
            let likely_audio = AUDIO_KEY_HINTS.iter().any(|hint| key.contains(*hint))
                || AUDIO_URL_HINTS.iter().any(|hint| url_lower.contains(*hint));
            likely_audio.then_some(url)
        }
        Value::Number(_) | Value::Bool(_) | Value::Null => None,
    }
}

/// Comparison key for headwords: no separators, no whitespace, lower-cased
pub fn keyify(text: &str) -> String {
    clean_text(text)
        .chars()
        .filter(|c| !KEY_SEPARATORS.contains(c) && !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

fn related(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

/// How well a donor's word key fits an entry's word key
pub fn match_score(entry_key: &str, donor_key: &str, query_key: &str) -> i32 {
    if !entry_key.is_empty() && !donor_key.is_empty() {
        if entry_key == donor_key {
            return EXACT_MATCH;
        }
        if related(entry_key, donor_key) {
            return CONTAINED_MATCH;
        }
    }
    if !query_key.is_empty() && !donor_key.is_empty() && related(query_key, donor_key) {
        return QUERY_MATCH;
    }
    0
}

/// Give entries without audio the URL of the closest entry that has one
pub fn propagate_audio(entries: &mut [NormalizedEntry], query: &str) {
    let donors: Vec<(String, String)> = entries
        .iter()
        .filter(|entry| !entry.audio_url.trim().is_empty())
        .map(|entry| (keyify(&entry.word), entry.audio_url.clone()))
        .collect();

    if donors.is_empty() {
        return;
    }

    let query_key = keyify(query);
    for entry in entries
        .iter_mut()
        .filter(|entry| entry.audio_url.trim().is_empty())
    {
        let entry_key = keyify(&entry.word);
        let mut best_url = "";
        let mut best_score = -1;

        for (donor_key, url) in &donors {
            let score = match_score(&entry_key, donor_key, &query_key);
            if score > best_score {
                best_score = score;
                best_url = url;
            }
        }

        if best_score >= MIN_DONOR_SCORE && !best_url.is_empty() {
            tracing::debug!("Borrowed audio for '{}' (score {})", entry.word, best_score);
            entry.audio_url = best_url.to_string();
        }
    }
}
