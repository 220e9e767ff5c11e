use anyhow::Context;
use hub_core::Language;
use hub_core::preprocess::Preprocessor;

use super::print_json;
use crate::state::AppState;

pub async fn run(
    state: &AppState,
    query: &str,
    language: Option<Language>,
    user: Option<&str>,
    record: bool,
) -> anyhow::Result<()> {
    let query = state.preprocessor.process(query);
    anyhow::ensure!(!query.is_empty(), "Please enter a word to search");

    let result = state
        .engine
        .search(&query, language)
        .await
        .with_context(|| format!("Search failed for '{query}'"))?;

    if record {
        state
            .store
            .record_history(&result.query, user)
            .context("Failed to record history")?;
        tracing::info!("Recorded '{}' in history", result.query);
    }

    print_json(&result)
}
