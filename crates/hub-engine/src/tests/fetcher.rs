use std::collections::HashMap;
use std::sync::Mutex;

use hub_core::{FetchError, Language, PayloadFetcher, SearchPayload};
use serde_json::json;

/// Serves canned payloads by query and records every request
#[derive(Default)]
pub struct StaticFetcher {
    payloads: HashMap<String, SearchPayload>,
    failing: Vec<String>,
    calls: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, query: &str, payload: SearchPayload) -> Self {
        self.payloads.insert(query.to_string(), payload);
        self
    }

    pub fn failing(mut self, query: &str) -> Self {
        self.failing.push(query.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl PayloadFetcher for StaticFetcher {
    async fn fetch(&self, query: &str, _language: Language) -> Result<SearchPayload, FetchError> {
        self.calls.lock().unwrap().push(query.to_string());

        if self.failing.iter().any(|q| q == query) {
            return Err(FetchError::AllEndpointsFailed(format!(
                "https://mirror/{query} status=503"
            )));
        }

        Ok(self
            .payloads
            .get(query)
            .cloned()
            .unwrap_or_else(|| json!({})))
    }
}

/// Payload in the documented shape with the given items in one section
pub fn section_payload(items: SearchPayload) -> SearchPayload {
    json!({
        "searchResultMap": {
            "searchResultListMap": {
                "WORD": {"query": "", "items": items}
            }
        }
    })
}
