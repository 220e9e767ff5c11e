use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use self::network::NetworkConfig;
use self::search::SearchConfig;
use self::state::StateConfig;

pub mod network;
pub mod search;
pub mod state;

pub use network::ProviderConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub network: NetworkConfig,
    pub search: SearchConfig,
    pub state: StateConfig,
}

impl Config {
    /// Defaults with environment overrides applied
    pub fn new() -> Self {
        Config {
            network: NetworkConfig::new(),
            search: SearchConfig::new(),
            state: StateConfig::new(),
        }
    }

    /// Load a JSON config file, falling back to `Config::new` when it is missing
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::new());
        }

        tracing::info!("Loading config from {}", path.display());
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut config: Config = serde_json::from_reader(reader)?;
        config.search = config.search.clamped();
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"search": {{"max_results": 5}}}}"#).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.search.max_results, 5);
        assert_eq!(config.search.max_alternates, 6);
        assert_eq!(config.network.ja.endpoints.len(), 3);
        assert_eq!(config.network.en.source, "en.dict.naver.com");
    }

    #[test]
    fn test_file_cannot_raise_result_cap() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"search": {{"max_results": 50}}}}"#).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.search.max_results, 10);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config.network.ja.referer_root(), "https://ja.dict.naver.com");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }
}
