use std::fs;
use std::path::Path;

use anyhow::Context;

use super::print_json;
use crate::state::AppState;

pub fn show(state: &AppState, user: Option<&str>) -> anyhow::Result<()> {
    print_json(&state.store.load_state(user))
}

pub fn save(state: &AppState, file: &Path, user: Option<&str>) -> anyhow::Result<()> {
    let data = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let payload: serde_json::Value =
        serde_json::from_str(&data).with_context(|| format!("Invalid JSON in {}", file.display()))?;

    let saved = state.store.save_state(&payload, user)?;
    print_json(&saved)
}
