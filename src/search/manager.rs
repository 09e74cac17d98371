use std::sync::Arc;

use tracing::{info, warn};

use super::{SearchProvider, SearchResult};
use crate::error::Result;

#[derive(Clone)]
pub struct SearchManager {
    provider: Arc<dyn SearchProvider>,
}

impl SearchManager {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self { provider }
    }

    pub async fn search(&self, query: &str, num_results: usize) -> Result<Vec<SearchResult>> {
        info!(query, num_results, "Performing search");
        match self.provider.search(query, num_results).await {
            Ok(results) => {
                info!(count = results.len(), "Search returned results");
                Ok(results)
            }
            Err(e) => {
                warn!(query, error = %e, "Search failed");
                Err(e)
            }
        }
    }
}
