use hub_config::ProviderConfig;
use hub_core::language::{HANGUL, JAPANESE, KANA, LATIN};
use hub_core::text::{clean_ruby_text, clean_text, has_reading_annotation, sanitize_ruby_html};
use hub_core::{Language, NormalizedEntry, RawCandidate};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::Value;

use crate::audio::extract_audio_url;
use crate::fields::{
    EXAMPLE_HINTS, MEANING_FALLBACK_HINTS, MEANING_HINTS, PRONUNCIATION_HINTS, READING_HINTS,
    WORD_HINTS, flatten_record, pick_best_text,
};

/// Keys only present on records of the documented search schema
const SCHEMA_MARKERS: [&str; 3] = ["expEntry", "expKanji", "meansCollector"];

/// Characters left unescaped in entry ids, matching a path segment
const ENTRY_ID_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

/// Phonetic symbols kept for an English headword
const MAX_PHONETIC_SYMBOLS: usize = 2;

/// Converts raw candidate records into canonical entries
pub struct EntryNormalizer<'a> {
    language: Language,
    provider: &'a ProviderConfig,
    media_root: &'a str,
    max_alternates: usize,
}

#[derive(Default)]
struct Senses {
    meaning: String,
    alternates: Vec<String>,
    example: String,
    example_ruby: String,
    example_translation: String,
}

impl<'a> EntryNormalizer<'a> {
    pub fn new(
        language: Language,
        provider: &'a ProviderConfig,
        media_root: &'a str,
        max_alternates: usize,
    ) -> Self {
        Self {
            language,
            provider,
            media_root,
            max_alternates,
        }
    }

    /// Normalize one record, `None` when it has no usable headword in the right script
    pub fn normalize(&self, record: &RawCandidate) -> Option<NormalizedEntry> {
        let entry = if has_schema_markers(record) {
            self.normalize_schema(record)
                .or_else(|| self.normalize_scored(record))
        } else {
            self.normalize_scored(record)
        }?;

        passes_script_check(&entry, self.language).then_some(entry)
    }

    fn normalize_schema(&self, record: &RawCandidate) -> Option<NormalizedEntry> {
        let (word, furigana) = match self.language {
            Language::En => (
                first_text(record, &["expEntry", "handleEntry", "expKanji"]),
                english_pronunciation(record),
            ),
            Language::Ja => {
                let reading = first_text(record, &["expEntry", "handleEntry"]);
                let kanji = text_field(record, "expKanji");
                if kanji.is_empty() {
                    (reading.clone(), reading)
                } else {
                    (kanji, reading)
                }
            }
        };

        if word.is_empty() {
            return None;
        }

        let senses = self.collect_senses(record);
        let mut entry = NormalizedEntry {
            word,
            furigana,
            meaning: senses.meaning,
            meaning_alternates: senses.alternates,
            example: senses.example,
            example_ruby: senses.example_ruby,
            example_translation: senses.example_translation,
            source_url: self.schema_source_url(record),
            audio_url: extract_audio_url(record, self.media_root),
        };
        entry.clear_redundant();
        Some(entry)
    }

    /// Walk `meansCollector[].means[]` for meanings and the first example pair
    fn collect_senses(&self, record: &RawCandidate) -> Senses {
        let mut senses = Senses::default();
        let mut has_example = false;

        let means = record
            .get("meansCollector")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_object)
            .filter_map(|group| group.get("means").and_then(Value::as_array))
            .flatten()
            .filter_map(Value::as_object);

        for mean in means {
            let value = text_field(mean, "value");
            if !value.is_empty() {
                if senses.meaning.is_empty() {
                    senses.meaning = value.clone();
                }
                if senses.alternates.len() < self.max_alternates
                    && !senses.alternates.contains(&value)
                {
                    senses.alternates.push(value);
                }
            }

            if has_example {
                continue;
            }

            let raw_example = mean
                .get("exampleOri")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let example = match self.language {
                Language::Ja => clean_ruby_text(raw_example),
                Language::En => clean_text(raw_example),
            };
            let translation = text_field(mean, "exampleTrans");

            if example.is_empty() && translation.is_empty() {
                continue;
            }

            has_example = true;
            if self.language == Language::Ja {
                let ruby = sanitize_ruby_html(raw_example);
                if has_reading_annotation(&ruby) {
                    senses.example_ruby = ruby;
                }
            }
            senses.example = example;
            senses.example_translation = translation;
        }

        senses
    }

    fn schema_source_url(&self, record: &RawCandidate) -> String {
        let link = record
            .get("destinationLink")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim();

        if link.starts_with("#/") {
            return format!("{}/{link}", self.provider.referer_root());
        }

        self.entry_url(&first_text(record, &["entryId"]))
    }

    fn entry_url(&self, entry_id: &str) -> String {
        let entry_id = entry_id.trim();
        if entry_id.is_empty() {
            return String::new();
        }
        format!(
            "{}{}",
            self.provider.entry_base,
            utf8_percent_encode(entry_id, ENTRY_ID_SET)
        )
    }

    /// Pick every field by key-path score, for records of unknown shape
    fn normalize_scored(&self, record: &RawCandidate) -> Option<NormalizedEntry> {
        let fields = flatten_record(record);
        let word_pattern = self.language.word_pattern();

        let word = pick_best_text(&fields, WORD_HINTS, Some(word_pattern));
        if word.is_empty() {
            return None;
        }

        let furigana = match self.language {
            Language::Ja => pick_best_text(&fields, READING_HINTS, Some(&*KANA)),
            Language::En => pick_best_text(&fields, PRONUNCIATION_HINTS, None),
        };

        let mut meaning = pick_best_text(&fields, MEANING_HINTS, Some(&*HANGUL));
        if meaning.is_empty() {
            meaning = pick_best_text(&fields, MEANING_FALLBACK_HINTS, None);
        }

        let example = pick_best_text(&fields, EXAMPLE_HINTS, Some(word_pattern));

        let mut entry = NormalizedEntry {
            word,
            furigana,
            meaning,
            example,
            source_url: self.entry_url(&first_text(record, &["entryId", "entry_id"])),
            audio_url: extract_audio_url(record, self.media_root),
            ..Default::default()
        };
        entry.clear_redundant();
        if !entry.meaning.is_empty() {
            entry.meaning_alternates = vec![entry.meaning.clone()];
        }
        Some(entry)
    }
}

fn has_schema_markers(record: &RawCandidate) -> bool {
    SCHEMA_MARKERS.iter().any(|key| record.contains_key(*key))
}

/// Japanese entries need Japanese text in the word or reading, English ones a latin word
pub fn passes_script_check(entry: &NormalizedEntry, language: Language) -> bool {
    match language {
        Language::Ja => JAPANESE.is_match(&entry.word) || JAPANESE.is_match(&entry.furigana),
        Language::En => LATIN.is_match(&entry.word),
    }
}

/// Cleaned text of a scalar field, empty for anything else
fn text_field(record: &RawCandidate, key: &str) -> String {
    match record.get(key) {
        Some(Value::String(text)) => clean_text(text),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    }
}

fn first_text(record: &RawCandidate, keys: &[&str]) -> String {
    keys.iter()
        .map(|key| text_field(record, key))
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

/// Up to two "<type> <symbol>" pairs, else the first flat phonetic field
fn english_pronunciation(record: &RawCandidate) -> String {
    let parts: Vec<String> = record
        .get("searchPhoneticSymbolList")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
        .filter_map(|symbol| {
            let value = text_field(symbol, "symbolValue");
            if value.is_empty() {
                return None;
            }
            let kind = text_field(symbol, "symbolType");
            Some(if kind.is_empty() {
                value
            } else {
                format!("{kind} {value}")
            })
        })
        .take(MAX_PHONETIC_SYMBOLS)
        .collect();

    if !parts.is_empty() {
        return parts.join(" | ");
    }

    first_text(record, &["phoneticSymbol", "expAudioRead", "expMeaningRead"])
}
