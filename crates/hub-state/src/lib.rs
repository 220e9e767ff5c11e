mod error;
mod sanitize;
mod store;

pub use error::StateError;
pub use sanitize::{
    HistoryEntry, SavedState, WordEntry, WordList, sanitize_state, sanitize_user_name,
};
pub use store::{StateStore, UserRecord};
