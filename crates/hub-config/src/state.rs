use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_user() -> String {
    "main".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    /// Directory holding users and saved word lists
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Profile created on first run
    #[serde(default = "default_user")]
    pub default_user: String,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            default_user: default_user(),
        }
    }
}

impl StateConfig {
    pub fn new() -> Self {
        let data_dir = env::var("HUB_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());

        let default_user = env::var("HUB_DEFAULT_USER").unwrap_or_else(|_| default_user());

        Self {
            data_dir,
            default_user,
        }
    }
}
