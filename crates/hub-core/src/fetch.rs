use crate::language::Language;
use crate::types::SearchPayload;

/// Source of raw search payloads
#[async_trait::async_trait]
pub trait PayloadFetcher: Send + Sync {
    /// Fetch the search payload for `query`
    async fn fetch(&self, query: &str, language: Language) -> Result<SearchPayload, FetchError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Every mirror failed; carries one message per attempt
    #[error("{0}")]
    AllEndpointsFailed(String),

    #[error("No endpoint available")]
    NoEndpoint,
}
