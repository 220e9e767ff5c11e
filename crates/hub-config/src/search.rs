use std::env;

use serde::{Deserialize, Serialize};

fn default_max_results() -> usize {
    10
}

fn default_max_alternates() -> usize {
    6
}

fn default_max_candidates() -> usize {
    8
}

fn default_max_candidate_len() -> usize {
    80
}

/// Bounds applied by the normalization engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Entries kept per result set
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Alternate meanings kept per entry
    #[serde(default = "default_max_alternates")]
    pub max_alternates: usize,
    /// Corrected/suggested queries kept per payload
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
    /// Longest suggestion accepted, in characters
    #[serde(default = "default_max_candidate_len")]
    pub max_candidate_len: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            max_alternates: default_max_alternates(),
            max_candidates: default_max_candidates(),
            max_candidate_len: default_max_candidate_len(),
        }
    }
}

impl SearchConfig {
    pub fn new() -> Self {
        let max_results = env::var("HUB_MAX_RESULTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_max_results);

        Self {
            max_results,
            ..Self::default()
        }
        .clamped()
    }

    /// Limits may be lowered but never raised above the defaults
    pub fn clamped(self) -> Self {
        Self {
            max_results: self.max_results.min(default_max_results()),
            max_alternates: self.max_alternates.min(default_max_alternates()),
            max_candidates: self.max_candidates.min(default_max_candidates()),
            max_candidate_len: self.max_candidate_len.min(default_max_candidate_len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_caps_at_defaults() {
        let config = SearchConfig {
            max_results: 50,
            max_alternates: 3,
            max_candidates: 100,
            max_candidate_len: 80,
        }
        .clamped();
        assert_eq!(config.max_results, 10);
        assert_eq!(config.max_alternates, 3);
        assert_eq!(config.max_candidates, 8);
        assert_eq!(config.max_candidate_len, 80);
    }
}
