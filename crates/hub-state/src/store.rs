use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use hub_config::state::StateConfig;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::StateError;
use crate::sanitize::{HistoryEntry, SavedState, sanitize_state, sanitize_user_name};

const USERS_FILE: &str = "users.json";
const STATE_DIR: &str = "state";
const MAX_RECORDED_HISTORY: usize = 400;
const HISTORY_ID_LEN: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: u64,
    pub name: String,
    pub created_at: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsersFile {
    next_id: u64,
    users: Vec<UserRecord>,
}

impl UsersFile {
    fn find(&self, user_ref: &str) -> Option<&UserRecord> {
        let by_id = user_ref
            .parse::<u64>()
            .ok()
            .filter(|_| user_ref.chars().all(|c| c.is_ascii_digit()))
            .and_then(|id| self.users.iter().find(|user| user.id == id));

        by_id.or_else(|| {
            let name = user_ref.to_lowercase();
            self.users.iter().find(|user| user.name.to_lowercase() == name)
        })
    }

    fn resolve(&self, user_ref: Option<&str>) -> Option<&UserRecord> {
        match user_ref.map(sanitize_user_name) {
            Some(user_ref) if !user_ref.is_empty() => self.find(&user_ref),
            _ => self.users.first(),
        }
    }
}

/// Users and their saved state, kept as JSON files under one data directory.
///
/// Every operation holds the same lock, so reads and writes of different users are
/// serialized too.
pub struct StateStore {
    data_dir: PathBuf,
    default_user: String,
    lock: Mutex<()>,
}

impl StateStore {
    pub fn new(config: &StateConfig) -> Self {
        Self {
            data_dir: config.data_dir.clone(),
            default_user: config.default_user.clone(),
            lock: Mutex::new(()),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Create the data directory and the default user when no user exists
    pub fn init(&self) -> Result<(), StateError> {
        let _guard = self.lock.lock();
        self.init_unlocked()
    }

    pub fn list_users(&self) -> Result<Vec<UserRecord>, StateError> {
        let _guard = self.lock.lock();
        self.init_unlocked()?;
        Ok(self.read_users()?.users)
    }

    pub fn create_user(&self, name: &str) -> Result<UserRecord, StateError> {
        let name = sanitize_user_name(name);
        if name.is_empty() {
            return Err(StateError::EmptyName);
        }

        let _guard = self.lock.lock();
        self.init_unlocked()?;
        let mut users = self.read_users()?;
        let user = self.insert_user(&mut users, name)?;
        self.write_users(&users)?;
        tracing::info!("Created user '{}' ({})", user.name, user.id);
        Ok(user)
    }

    /// Remove a user and their saved state; the last remaining user cannot be deleted
    pub fn delete_user(&self, user_ref: &str) -> Result<UserRecord, StateError> {
        let user_ref = sanitize_user_name(user_ref);
        if user_ref.is_empty() {
            return Err(StateError::UnknownUser(user_ref));
        }

        let _guard = self.lock.lock();
        self.init_unlocked()?;
        let mut users = self.read_users()?;
        let user = users
            .find(&user_ref)
            .cloned()
            .ok_or_else(|| StateError::UnknownUser(user_ref.clone()))?;

        if users.users.len() <= 1 {
            return Err(StateError::LastProfile);
        }

        users.users.retain(|other| other.id != user.id);
        self.write_users(&users)?;

        match fs::remove_file(self.state_path(user.id)) {
            Err(e) if e.kind() != ErrorKind::NotFound => return Err(e.into()),
            _ => {}
        }

        tracing::info!("Deleted user '{}' ({})", user.name, user.id);
        Ok(user)
    }

    /// Digits select by id, anything else by case-insensitive name; `None` means the first user
    pub fn resolve_user(&self, user_ref: Option<&str>) -> Result<Option<UserRecord>, StateError> {
        let _guard = self.lock.lock();
        self.init_unlocked()?;
        Ok(self.read_users()?.resolve(user_ref).cloned())
    }

    /// Saved state of a user; unreadable or missing state is empty
    pub fn load_state(&self, user_ref: Option<&str>) -> SavedState {
        let _guard = self.lock.lock();
        match self.load_state_unlocked(user_ref) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!("Failed to load state: {}", e);
                SavedState::default()
            }
        }
    }

    /// Sanitize and store `payload`; for an unknown user nothing is written
    pub fn save_state(
        &self,
        payload: &Value,
        user_ref: Option<&str>,
    ) -> Result<SavedState, StateError> {
        let state = sanitize_state(payload);

        let _guard = self.lock.lock();
        self.init_unlocked()?;
        let Some(user) = self.read_users()?.resolve(user_ref).cloned() else {
            tracing::warn!("Not saving state for unknown user {:?}", user_ref);
            return Ok(state);
        };

        self.write_state(user.id, &state)?;
        tracing::debug!(
            "Saved {} lists and {} history rows for '{}'",
            state.lists.len(),
            state.history.len(),
            user.name
        );
        Ok(state)
    }

    /// Put `query` at the top of a user's history, dropping older copies of it
    pub fn record_history(
        &self,
        query: &str,
        user_ref: Option<&str>,
    ) -> Result<SavedState, StateError> {
        let _guard = self.lock.lock();
        self.init_unlocked()?;
        let user = self
            .read_users()?
            .resolve(user_ref)
            .cloned()
            .ok_or_else(|| StateError::UnknownUser(user_ref.unwrap_or_default().to_string()))?;

        let mut state = self.read_state(user.id).unwrap_or_else(|e| {
            tracing::warn!("Discarding unreadable state of '{}': {}", user.name, e);
            SavedState::default()
        });

        let entry = new_history_entry(query);
        let key = entry.query.to_lowercase();
        state.history.retain(|row| row.query.to_lowercase() != key);
        state.history.insert(0, entry);
        state.history.truncate(MAX_RECORDED_HISTORY);

        self.write_state(user.id, &state)?;
        Ok(state)
    }

    fn init_unlocked(&self) -> Result<(), StateError> {
        fs::create_dir_all(self.data_dir.join(STATE_DIR))?;

        let mut users = self.read_users()?;
        if !users.users.is_empty() {
            return Ok(());
        }

        let user = self.insert_user(&mut users, sanitize_user_name(&self.default_user))?;
        self.write_users(&users)?;
        tracing::info!("Created default user '{}'", user.name);
        Ok(())
    }

    fn load_state_unlocked(&self, user_ref: Option<&str>) -> Result<SavedState, StateError> {
        self.init_unlocked()?;
        match self.read_users()?.resolve(user_ref) {
            Some(user) => self.read_state(user.id),
            None => Ok(SavedState::default()),
        }
    }

    /// Append a user with an empty state file
    fn insert_user(&self, users: &mut UsersFile, name: String) -> Result<UserRecord, StateError> {
        if name.is_empty() {
            return Err(StateError::EmptyName);
        }
        let key = name.to_lowercase();
        if users.users.iter().any(|user| user.name.to_lowercase() == key) {
            return Err(StateError::DuplicateName(name));
        }

        users.next_id = users.next_id.max(1);
        let user = UserRecord {
            id: users.next_id,
            name,
            created_at: chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        };
        users.next_id += 1;
        users.users.push(user.clone());

        self.write_state(user.id, &SavedState::default())?;
        Ok(user)
    }

    fn users_path(&self) -> PathBuf {
        self.data_dir.join(USERS_FILE)
    }

    fn state_path(&self, user_id: u64) -> PathBuf {
        self.data_dir.join(STATE_DIR).join(format!("{user_id}.json"))
    }

    fn read_users(&self) -> Result<UsersFile, StateError> {
        match fs::read_to_string(self.users_path()) {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(UsersFile::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_users(&self, users: &UsersFile) -> Result<(), StateError> {
        fs::write(self.users_path(), serde_json::to_string_pretty(users)?)?;
        Ok(())
    }

    /// Stored state, sanitized again on the way in
    fn read_state(&self, user_id: u64) -> Result<SavedState, StateError> {
        match fs::read_to_string(self.state_path(user_id)) {
            Ok(data) => {
                let value: Value = serde_json::from_str(&data)?;
                Ok(sanitize_state(&value))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(SavedState::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_state(&self, user_id: u64, state: &SavedState) -> Result<(), StateError> {
        fs::write(self.state_path(user_id), serde_json::to_string(state)?)?;
        Ok(())
    }
}

fn new_history_entry(query: &str) -> HistoryEntry {
    let id = Uuid::new_v4().simple().to_string();
    HistoryEntry {
        id: format!("h_{}", &id[..HISTORY_ID_LEN]),
        query: hub_core::text::clean_text(query),
        created_at: chrono::Utc::now().to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn store() -> (TempDir, StateStore) {
        let dir = tempfile::tempdir().unwrap();
        let config = StateConfig {
            data_dir: dir.path().to_path_buf(),
            default_user: "main".to_string(),
        };
        let store = StateStore::new(&config);
        store.init().unwrap();
        (dir, store)
    }

    #[test]
    fn test_init_creates_default_user() {
        let (dir, store) = store();
        let users = store.list_users().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "main");
        assert_eq!(users[0].id, 1);
        assert!(dir.path().join("users.json").exists());
        assert!(dir.path().join("state").join("1.json").exists());

        store.init().unwrap();
        assert_eq!(store.list_users().unwrap().len(), 1);
    }

    #[test]
    fn test_create_user_rejects_bad_names() {
        let (_dir, store) = store();
        assert!(matches!(store.create_user(" <b></b> "), Err(StateError::EmptyName)));
        assert!(matches!(store.create_user("MAIN"), Err(StateError::DuplicateName(_))));

        let user = store.create_user(" bill ").unwrap();
        assert_eq!(user.name, "bill");
        assert_eq!(user.id, 2);
    }

    #[test]
    fn test_resolve_user() {
        let (_dir, store) = store();
        store.create_user("bill").unwrap();

        let by_name = store.resolve_user(Some("BILL")).unwrap().unwrap();
        assert_eq!(by_name.id, 2);
        let by_id = store.resolve_user(Some("1")).unwrap().unwrap();
        assert_eq!(by_id.name, "main");
        let first = store.resolve_user(None).unwrap().unwrap();
        assert_eq!(first.name, "main");
        assert!(store.resolve_user(Some("nobody")).unwrap().is_none());
    }

    #[test]
    fn test_delete_user() {
        let (dir, store) = store();
        store.create_user("bill").unwrap();

        assert!(matches!(store.delete_user("nobody"), Err(StateError::UnknownUser(_))));

        let deleted = store.delete_user("Bill").unwrap();
        assert_eq!(deleted.id, 2);
        assert!(!dir.path().join("state").join("2.json").exists());

        assert!(matches!(store.delete_user("main"), Err(StateError::LastProfile)));
    }

    #[test]
    fn test_deleted_ids_are_not_reused() {
        let (_dir, store) = store();
        store.create_user("bill").unwrap();
        store.delete_user("bill").unwrap();
        let user = store.create_user("ann").unwrap();
        assert_eq!(user.id, 3);
    }

    #[test]
    fn test_save_and_load_state() {
        let (_dir, store) = store();
        let payload = json!({
            "lists": [{"id": "l1", "name": "Food", "words": [{"word": "猫"}]}],
            "history": ["ねこ"]
        });

        let saved = store.save_state(&payload, Some("main")).unwrap();
        assert_eq!(saved.lists[0].words[0].word, "猫");
        assert_eq!(store.load_state(None), saved);
    }

    #[test]
    fn test_save_for_unknown_user_writes_nothing() {
        let (_dir, store) = store();
        let saved = store
            .save_state(&json!({"history": ["ねこ"]}), Some("nobody"))
            .unwrap();
        assert_eq!(saved.history.len(), 1);
        assert!(store.load_state(None).history.is_empty());
        assert!(store.load_state(Some("nobody")).history.is_empty());
    }

    #[test]
    fn test_unreadable_state_loads_empty() {
        let (dir, store) = store();
        fs::write(dir.path().join("state").join("1.json"), "{not json").unwrap();
        assert_eq!(store.load_state(None), SavedState::default());
    }

    #[test]
    fn test_record_history() {
        let (_dir, store) = store();
        store.record_history("ねこ", None).unwrap();
        store.record_history("Cat", None).unwrap();
        let state = store.record_history("cat", None).unwrap();

        let queries: Vec<&str> = state.history.iter().map(|h| h.query.as_str()).collect();
        assert_eq!(queries, vec!["cat", "ねこ"]);
        assert!(state.history[0].id.starts_with("h_"));
        assert_eq!(state.history[0].id.len(), 2 + HISTORY_ID_LEN);
        assert!(!state.history[0].created_at.is_empty());
        assert_eq!(store.load_state(None), state);
    }

    #[test]
    fn test_record_history_is_capped() {
        let (_dir, store) = store();
        let history: Vec<String> = (0..MAX_RECORDED_HISTORY).map(|i| format!("q{i}")).collect();
        store.save_state(&json!({"history": history}), None).unwrap();

        let state = store.record_history("new", None).unwrap();
        assert_eq!(state.history.len(), MAX_RECORDED_HISTORY);
        assert_eq!(state.history[0].query, "new");
        assert!(matches!(
            store.record_history("x", Some("nobody")),
            Err(StateError::UnknownUser(_))
        ));
    }
}
