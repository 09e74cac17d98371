pub mod manager;
pub mod serp;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use manager::SearchManager;
pub use serp::SerpSearchProvider;

/// One web search hit, as handed to the research chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_authority: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
}

impl SearchResult {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        let url = url.into();
        Self {
            domain: domain_of(&url),
            title: title.into(),
            url,
            snippet: snippet.into(),
            published_date: None,
            domain_authority: None,
            relevance_score: None,
        }
    }
}

fn domain_of(url: &str) -> Option<String> {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Returns at most `num_results` hits in backend order.
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<SearchResult>>;
}
