use super::print_json;
use crate::state::AppState;

pub fn list(state: &AppState) -> anyhow::Result<()> {
    print_json(&state.store.list_users()?)
}

pub fn add(state: &AppState, name: &str) -> anyhow::Result<()> {
    print_json(&state.store.create_user(name)?)
}

pub fn delete(state: &AppState, user: &str) -> anyhow::Result<()> {
    print_json(&state.store.delete_user(user)?)
}
