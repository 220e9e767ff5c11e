use std::time::Duration;

use async_trait::async_trait;
use hub_config::network::NetworkConfig;
use hub_core::{FetchError, Language, PayloadFetcher, SearchPayload};
use reqwest::header::{ACCEPT, REFERER, USER_AGENT};

const ACCEPT_VALUE: &str = "application/json,text/plain,*/*";

/// Fetches search payloads from the dictionary API, falling through its mirrors
#[derive(Clone)]
pub struct NaverClient {
    client: reqwest::Client,
    network: NetworkConfig,
}

impl NaverClient {
    pub fn new(network: NetworkConfig) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(network.timeout_secs))
            .build()?;

        Ok(Self { client, network })
    }

    async fn fetch_endpoint(
        &self,
        endpoint: &str,
        query: &str,
        referer: &str,
    ) -> Result<SearchPayload, String> {
        let params = [
            ("query", query),
            ("range", "word"),
            ("page", "1"),
            ("shouldSearchExample", "true"),
        ];

        let response = self
            .client
            .get(endpoint)
            .query(&params)
            .header(USER_AGENT, &self.network.user_agent)
            .header(REFERER, referer)
            .header(ACCEPT, ACCEPT_VALUE)
            .send()
            .await
            .map_err(|e| format!("{endpoint} error={e}"))?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(format!("{endpoint} status={}", response.status().as_u16()));
        }

        response
            .json::<SearchPayload>()
            .await
            .map_err(|e| format!("{endpoint} error={e}"))
    }
}

#[async_trait]
impl PayloadFetcher for NaverClient {
    async fn fetch(&self, query: &str, language: Language) -> Result<SearchPayload, FetchError> {
        let provider = language.provider(&self.network);
        if provider.endpoints.is_empty() {
            return Err(FetchError::NoEndpoint);
        }

        let mut errors = Vec::new();
        for endpoint in &provider.endpoints {
            match self.fetch_endpoint(endpoint, query, &provider.referer).await {
                Ok(payload) => {
                    tracing::debug!("Fetched '{}' from {}", query, endpoint);
                    return Ok(payload);
                }
                Err(e) => {
                    tracing::warn!("Mirror failed: {}", e);
                    errors.push(e);
                }
            }
        }

        Err(FetchError::AllEndpointsFailed(errors.join(" | ")))
    }
}
