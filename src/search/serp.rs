use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{error, info, warn};

use super::{SearchProvider, SearchResult};
use crate::error::{ResearchError, Result};

/// Google search through SerpAPI.
#[derive(Debug, Clone)]
pub struct SerpSearchProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SerpResponse {
    organic_results: Option<Vec<OrganicResult>>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    title: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
    position: Option<u32>,
    date: Option<String>,
}

impl OrganicResult {
    fn into_search_result(self) -> SearchResult {
        let mut result = SearchResult::new(
            self.title.unwrap_or_default(),
            self.link.unwrap_or_default(),
            self.snippet.unwrap_or_default(),
        );
        result.published_date = self.date;
        result.relevance_score = self
            .position
            .filter(|p| *p > 0)
            .map(|p| 1.0 / f64::from(p));
        result
    }
}

impl SerpSearchProvider {
    pub fn new(api_key: &str, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch(&self, query: &str, num_results: usize) -> anyhow::Result<SerpResponse> {
        let num = num_results.to_string();
        let response = self
            .client
            .get(format!("{}/search.json", self.base_url))
            .query(&[
                ("q", query),
                ("api_key", self.api_key.as_str()),
                ("engine", "google"),
                ("num", num.as_str()),
                ("google_domain", "google.com"),
            ])
            .send()
            .await
            .context("Failed to send request to SerpAPI")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("SerpAPI error ({}): {}", status, body);
        }

        let body: SerpResponse = response
            .json()
            .await
            .context("Failed to parse SerpAPI response")?;

        if let Some(message) = &body.error {
            anyhow::bail!("SerpAPI error: {}", message);
        }

        Ok(body)
    }
}

#[async_trait]
impl SearchProvider for SerpSearchProvider {
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<SearchResult>> {
        if query.is_empty() {
            return Err(ResearchError::InvalidArgument("Query cannot be empty".into()));
        }
        if num_results < 1 {
            return Err(ResearchError::InvalidArgument(
                "num_results must be positive".into(),
            ));
        }

        info!(query, "Searching SerpAPI");
        let body = match self.fetch(query, num_results).await {
            Ok(body) => body,
            Err(e) => {
                error!(error = %format!("{e:#}"), "SerpAPI search failed");
                return Err(e.into());
            }
        };

        let Some(organic) = body.organic_results else {
            warn!(query, "No organic results found");
            return Ok(Vec::new());
        };

        let results: Vec<SearchResult> = organic
            .into_iter()
            .take(num_results)
            .map(OrganicResult::into_search_result)
            .collect();

        info!(count = results.len(), "SerpAPI returned results");
        Ok(results)
    }
}
