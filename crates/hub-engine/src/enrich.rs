//! Secondary meanings for single-word English lookups.
//!
//! The probe and the term list target accounting vocabulary ("impairment" → "impairment
//! loss"). They are fixed tables rather than configuration.

use std::collections::HashSet;

use hub_core::NormalizedEntry;
use hub_core::text::clean_text;

use crate::audio::keyify;

/// Appended to the query for the probe lookup
const PROBE_SUFFIX: &str = "loss";

const DOMAIN_TERMS: [&str; 8] = [
    "감손",
    "손상차손",
    "감액손실",
    "평가손",
    "회계",
    "손실",
    "loss",
    "impairment loss",
];

const SAME_WORD_SCORE: i32 = 20;
const PROBE_WORD_SCORE: i32 = 45;
const DOMAIN_MEANING_SCORE: i32 = 35;
const MIN_SCORE: i32 = 40;

/// Enrichment runs only for queries without inner whitespace
pub fn is_single_token(query: &str) -> bool {
    let query = clean_text(query);
    !query.is_empty() && !query.contains(' ')
}

pub fn probe_query(query: &str) -> String {
    format!("{} {PROBE_SUFFIX}", clean_text(query))
}

/// Entry words equal to or containing the query take part; an empty side always does
fn word_matches(word_key: &str, query_key: &str) -> bool {
    query_key.is_empty()
        || word_key.is_empty()
        || word_key == query_key
        || word_key.contains(query_key)
}

/// Meaning keys already shown for words matching the query
pub fn primary_meaning_keys(entries: &[NormalizedEntry], query_key: &str) -> HashSet<String> {
    entries
        .iter()
        .filter(|entry| word_matches(&keyify(&entry.word), query_key))
        .map(|entry| keyify(&entry.meaning))
        .filter(|key| !key.is_empty())
        .collect()
}

/// Best probe entry carrying a new meaning, if it scores high enough
pub fn pick_secondary_meaning(
    probe_entries: Vec<NormalizedEntry>,
    query_key: &str,
    meaning_keys: &HashSet<String>,
) -> Option<NormalizedEntry> {
    let mut best: Option<NormalizedEntry> = None;
    let mut best_score = -1;

    for entry in probe_entries {
        let word_key = keyify(&entry.word);
        if !word_matches(&word_key, query_key) {
            continue;
        }

        let meaning = clean_text(&entry.meaning);
        let meaning_key = keyify(&meaning);
        if meaning_key.is_empty() || meaning_keys.contains(&meaning_key) {
            continue;
        }

        let meaning_lower = meaning.to_lowercase();
        let mut score = 0;
        if word_key == query_key {
            score += SAME_WORD_SCORE;
        }
        if entry.word.to_lowercase().contains(PROBE_SUFFIX) {
            score += PROBE_WORD_SCORE;
        }
        if DOMAIN_TERMS.iter().any(|term| meaning_lower.contains(*term)) {
            score += DOMAIN_MEANING_SCORE;
        }

        if score > best_score {
            best_score = score;
            best = Some(entry);
        }
    }

    best.filter(|_| best_score >= MIN_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(word: &str, meaning: &str) -> NormalizedEntry {
        NormalizedEntry {
            word: word.to_string(),
            meaning: meaning.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_single_token() {
        assert!(is_single_token(" impairment "));
        assert!(!is_single_token("impairment loss"));
        assert!(!is_single_token(""));
        assert_eq!(probe_query("impairment"), "impairment loss");
    }

    #[test]
    fn test_primary_meaning_keys() {
        let entries = vec![
            entry("impairment", "손상"),
            entry("impair", "해치다"),
            entry("Impairment test", "손상 검사"),
        ];
        let keys = primary_meaning_keys(&entries, "impairment");
        assert_eq!(keys.len(), 2);
        assert!(keys.contains("손상"));
        assert!(keys.contains("손상검사"));
    }

    #[test]
    fn test_pick_prefers_domain_meaning() {
        let known: HashSet<String> = ["손상".to_string()].into_iter().collect();
        let picked = pick_secondary_meaning(
            vec![
                entry("impairment", "손상"),
                entry("loss", "손실"),
                entry("impairment", "장애"),
                entry("impairment loss", "손상차손"),
            ],
            "impairment",
            &known,
        )
        .unwrap();
        assert_eq!(picked.word, "impairment loss");
    }

    #[test]
    fn test_pick_below_threshold() {
        let picked = pick_secondary_meaning(
            vec![entry("impairment", "장애")],
            "impairment",
            &HashSet::new(),
        );
        assert!(picked.is_none());
    }
}
