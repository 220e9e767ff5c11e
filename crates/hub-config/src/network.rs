use std::env;

use serde::{Deserialize, Serialize};

fn default_timeout_secs() -> u64 {
    8
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36"
        .to_string()
}

fn default_media_root() -> String {
    "https://dict.naver.com".to_string()
}

/// Endpoints and link roots of one dictionary direction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Mirrors, tried in order
    pub endpoints: Vec<String>,
    pub referer: String,
    /// Host reported as the result source
    pub source: String,
    /// Prefix for entry deep links built from an entry id
    pub entry_base: String,
}

impl ProviderConfig {
    pub fn japanese() -> Self {
        Self {
            endpoints: vec![
                "https://ja.dict.naver.com/api3/jako/search".to_string(),
                "https://dict.naver.com/api3/jako/search".to_string(),
                "https://jpdict.naver.com/api3/jako/search".to_string(),
            ],
            referer: "https://ja.dict.naver.com/".to_string(),
            source: "ja.dict.naver.com".to_string(),
            entry_base: "https://ja.dict.naver.com/#/entry/jako/".to_string(),
        }
    }

    pub fn english() -> Self {
        Self {
            endpoints: vec![
                "https://en.dict.naver.com/api3/enko/search".to_string(),
                "https://dict.naver.com/api3/enko/search".to_string(),
                "https://endic.naver.com/api3/enko/search".to_string(),
            ],
            referer: "https://en.dict.naver.com/".to_string(),
            source: "en.dict.naver.com".to_string(),
            entry_base: "https://en.dict.naver.com/#/entry/enko/".to_string(),
        }
    }

    /// Referer without its trailing slash
    pub fn referer_root(&self) -> &str {
        self.referer.trim_end_matches('/')
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    #[serde(default = "ProviderConfig::japanese")]
    pub ja: ProviderConfig,
    #[serde(default = "ProviderConfig::english")]
    pub en: ProviderConfig,
    /// Root for site-relative media paths
    #[serde(default = "default_media_root")]
    pub media_root: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            ja: ProviderConfig::japanese(),
            en: ProviderConfig::english(),
            media_root: default_media_root(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl NetworkConfig {
    pub fn new() -> Self {
        let mut config = Self::default();

        if let Some(timeout_secs) = env::var("HUB_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.timeout_secs = timeout_secs;
        }

        if let Ok(user_agent) = env::var("HUB_USER_AGENT") {
            config.user_agent = user_agent;
        }

        config
    }
}
