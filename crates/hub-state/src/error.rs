use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("Unknown user: {0}")]
    UnknownUser(String),
    #[error("Please enter a username")]
    EmptyName,
    #[error("Username already exists: {0}")]
    DuplicateName(String),
    #[error("At least one profile must remain")]
    LastProfile,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
