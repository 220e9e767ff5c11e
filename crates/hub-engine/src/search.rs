use std::collections::HashSet;

use hub_config::Config;
use hub_config::network::NetworkConfig;
use hub_config::search::SearchConfig;
use hub_core::text::clean_text;
use hub_core::{
    FetchError, Language, NormalizedEntry, PayloadFetcher, ResultSet, SearchPayload,
    detect_language,
};

use crate::audio::{keyify, propagate_audio};
use crate::candidates::collect_query_candidates;
use crate::enrich;
use crate::extract::{extract_direct_items, extract_generic_items};
use crate::normalize::EntryNormalizer;

type DedupKey = (String, String, String, String);

/// Entries produced from one payload
struct NormalizedPass {
    entries: Vec<NormalizedEntry>,
    raw_count: usize,
}

/// Turns queries into normalized result sets through a payload fetcher.
///
/// Holds only read-only configuration; every `search` call owns its own dedup set, so one
/// engine can serve concurrent lookups.
pub struct SearchEngine<F> {
    fetcher: F,
    network: NetworkConfig,
    search: SearchConfig,
}

impl<F: PayloadFetcher> SearchEngine<F> {
    pub fn new(fetcher: F, config: &Config) -> Self {
        Self {
            fetcher,
            network: config.network.clone(),
            search: config.search.clone(),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Look up `query`, retrying with mined corrections when the first pass finds nothing.
    ///
    /// An empty result set is a normal outcome; `Err` means a fetch failed on every mirror.
    pub async fn search(
        &self,
        query: &str,
        language: Option<Language>,
    ) -> Result<ResultSet, FetchError> {
        let query = clean_text(query);
        let language = language.unwrap_or_else(|| detect_language(&query));
        tracing::info!("Searching '{}' ({})", query, language);

        let payload = self.fetcher.fetch(&query, language).await?;
        let mut suggestions = collect_query_candidates(&payload, &query, &self.search);
        let mut corrected_query = suggestions.first().cloned().unwrap_or_default();

        let mut seen: HashSet<DedupKey> = HashSet::new();
        let pass = self.normalize_payload(&payload, language, &mut seen);
        let raw_count = pass.raw_count;
        let mut results = pass.entries;
        let mut resolved_query = query.clone();

        if results.is_empty() {
            let retry_queries: Vec<String> = std::iter::once(corrected_query.clone())
                .chain(suggestions.iter().cloned())
                .filter(|candidate| !candidate.is_empty())
                .collect();

            let mut tried: HashSet<String> = HashSet::from([query.to_lowercase()]);
            for candidate in retry_queries {
                if !tried.insert(candidate.to_lowercase()) {
                    continue;
                }

                tracing::debug!("No entries for '{}', retrying with '{}'", query, candidate);
                let retry_payload = self.fetcher.fetch(&candidate, language).await?;
                let pass = self.normalize_payload(&retry_payload, language, &mut seen);
                if pass.entries.is_empty() {
                    continue;
                }

                results = pass.entries;
                if corrected_query.is_empty() || suggestions.is_empty() {
                    let retry_candidates =
                        collect_query_candidates(&retry_payload, &query, &self.search);
                    if corrected_query.is_empty() {
                        corrected_query = retry_candidates.first().cloned().unwrap_or_default();
                    }
                    if suggestions.is_empty() {
                        suggestions = retry_candidates;
                    }
                }
                resolved_query = candidate;
                break;
            }
        }

        if corrected_query.is_empty() && resolved_query != query {
            corrected_query = resolved_query.clone();
        }

        propagate_audio(&mut results, &query);

        if language == Language::En && enrich::is_single_token(&query) {
            self.enrich_english(&query, &mut results, &mut seen).await;
        }

        tracing::info!(
            "'{}' resolved as '{}': {} entries from {} candidates",
            query,
            resolved_query,
            results.len(),
            raw_count
        );

        Ok(ResultSet {
            query,
            corrected_query,
            resolved_query,
            suggestions,
            language,
            source: language.provider(&self.network).source.clone(),
            results,
            raw_count,
        })
    }

    /// Extract, normalize and dedup the entries of one payload
    fn normalize_payload(
        &self,
        payload: &SearchPayload,
        language: Language,
        seen: &mut HashSet<DedupKey>,
    ) -> NormalizedPass {
        let mut candidates = extract_direct_items(payload);
        if candidates.is_empty() {
            candidates = extract_generic_items(payload, language);
            tracing::debug!("Generic miner found {} candidates", candidates.len());
        }

        let normalizer = EntryNormalizer::new(
            language,
            language.provider(&self.network),
            &self.network.media_root,
            self.search.max_alternates,
        );

        let mut entries = Vec::new();
        for candidate in &candidates {
            let Some(entry) = normalizer.normalize(candidate) else {
                continue;
            };
            if !seen.insert(entry.dedup_key()) {
                continue;
            }
            entries.push(entry);
            if entries.len() >= self.search.max_results {
                break;
            }
        }

        tracing::debug!(
            "Normalized {} of {} candidates",
            entries.len(),
            candidates.len()
        );

        NormalizedPass {
            entries,
            raw_count: candidates.len(),
        }
    }

    /// Append one accounting-domain meaning found by probing "<query> loss"
    async fn enrich_english(
        &self,
        query: &str,
        results: &mut Vec<NormalizedEntry>,
        seen: &mut HashSet<DedupKey>,
    ) {
        if results.len() >= self.search.max_results {
            return;
        }

        let query_key = keyify(query);
        let meaning_keys = enrich::primary_meaning_keys(results, &query_key);

        let probe = enrich::probe_query(query);
        let probe_entries = match self.fetcher.fetch(&probe, Language::En).await {
            Ok(payload) => self.normalize_payload(&payload, Language::En, seen).entries,
            Err(e) => {
                tracing::warn!("Enrichment probe '{}' failed: {}", probe, e);
                return;
            }
        };

        if let Some(entry) = enrich::pick_secondary_meaning(probe_entries, &query_key, &meaning_keys)
        {
            tracing::debug!("Added secondary meaning '{}' for '{}'", entry.meaning, query);
            results.push(entry);
        }
    }
}
