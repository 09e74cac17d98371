pub mod request;

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::{ResearchError, Result};
use crate::instrumentation::{RunLog, RunLogger, SessionLog};
use crate::llm::{LanguageModel, ModelFactory, ModelProvider};
use crate::research::{prompts, Depth, ResearchChainManager, ResearchOutput};
use crate::search::{SearchManager, SearchProvider, SearchResult, SerpSearchProvider};

pub use request::{sanitize_input, ResearchRequest, ValidatedRequest};

/// At most this many sources are echoed back to the caller.
const MAX_REPORTED_SOURCES: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct SourceSummary {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

impl From<&SearchResult> for SourceSummary {
    fn from(result: &SearchResult) -> Self {
        Self {
            title: result.title.clone(),
            url: result.url.clone(),
            snippet: result.snippet.clone(),
        }
    }
}

/// What a completed research request returns. Only `result`, `duration`,
/// `depth` and `sources` go over the wire; `run` is the record written to the
/// run log.
#[derive(Debug, Clone, Serialize)]
pub struct ResearchReport {
    pub result: String,
    pub duration: f64,
    pub depth: Depth,
    pub sources: Vec<SourceSummary>,
    #[serde(skip)]
    pub run: RunLog,
}

pub struct ResearchAssistant {
    config: Config,
    models: ModelFactory,
    search: SearchManager,
    run_logger: Option<RunLogger>,
}

impl ResearchAssistant {
    pub fn new(config: Config) -> Result<Self> {
        let provider = SerpSearchProvider::new(&config.serpapi_api_key, &config.serpapi_base_url);
        Self::with_search_provider(config, Arc::new(provider))
    }

    pub fn with_search_provider(
        config: Config,
        search_provider: Arc<dyn SearchProvider>,
    ) -> Result<Self> {
        let run_logger = config
            .log_dir
            .as_ref()
            .map(RunLogger::new)
            .transpose()
            .map_err(|e| ResearchError::Configuration(format!("{e:#}")))?;

        Ok(Self {
            models: ModelFactory::new(config.registry.clone()),
            search: SearchManager::new(search_provider),
            run_logger,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn available_providers(&self) -> Vec<ModelProvider> {
        self.config.available_providers()
    }

    /// Validates the request, then runs search and the research chain. Any
    /// validation failure is returned before a client is built or a backend
    /// is contacted.
    pub async fn research(&self, request: &ResearchRequest) -> Result<ResearchReport> {
        let validated = request.validate(&self.available_providers())?;
        info!(
            topic = %validated.topic,
            depth = %validated.depth,
            provider = %validated.provider,
            "Research request"
        );

        let mut log = SessionLog::new(uuid::Uuid::new_v4().to_string());
        log.log_step(
            "request_validated",
            json!({
                "topic": validated.topic,
                "depth": validated.depth,
                "provider": validated.provider,
            }),
        );

        let llm = self.create_model(validated.provider)?;
        let outcome = self.run(&validated, llm.clone(), &mut log).await;

        let steps = log.drain();
        for entry in &steps {
            debug!(
                session = log.session_id(),
                step = %entry.step,
                details = %entry.details,
                "Research step"
            );
        }

        match outcome {
            Ok((output, sources)) => {
                info!(topic = %validated.topic, "Research completed successfully");
                let run = RunLog {
                    id: log.session_id().to_string(),
                    timestamp: chrono::Utc::now().to_rfc3339(),
                    topic: validated.topic.clone(),
                    depth: validated.depth.to_string(),
                    provider: validated.provider.to_string(),
                    model: llm.model_name().to_string(),
                    num_sources: sources.len(),
                    duration_secs: output.duration,
                    input_tokens: output.usage.input_tokens,
                    output_tokens: output.usage.output_tokens,
                    steps,
                };
                self.record_run(&run);

                Ok(ResearchReport {
                    result: output.result,
                    duration: output.duration,
                    depth: output.depth,
                    sources: sources
                        .iter()
                        .take(MAX_REPORTED_SOURCES)
                        .map(SourceSummary::from)
                        .collect(),
                    run,
                })
            }
            Err(e) => {
                error!(topic = %validated.topic, error = %e, "Research error");
                Err(e)
            }
        }
    }

    fn create_model(&self, provider: ModelProvider) -> Result<Arc<dyn LanguageModel>> {
        let api_key = self.config.api_key(provider).ok_or_else(|| {
            ResearchError::Configuration(format!("{} is not set", provider.api_key_var()))
        })?;
        self.models.create_model(
            provider.as_str(),
            api_key,
            self.config.temperature,
            self.config.max_tokens,
        )
    }

    async fn run(
        &self,
        request: &ValidatedRequest,
        llm: Arc<dyn LanguageModel>,
        log: &mut SessionLog,
    ) -> Result<(ResearchOutput, Vec<SearchResult>)> {
        let sources = self
            .search
            .search(&request.topic, self.config.num_results)
            .await?;
        log.log_step("search_complete", json!({ "count": sources.len() }));

        let instruction = prompts::instruction_prompt(request.depth, &request.topic);
        let chain = ResearchChainManager::new(llm);
        let output = chain
            .process_research(&request.topic, &instruction, &sources, request.depth, log)
            .await?;

        Ok((output, sources))
    }

    fn record_run(&self, run: &RunLog) {
        let Some(run_logger) = &self.run_logger else {
            return;
        };
        if let Err(e) = run_logger.write(run) {
            warn!(error = %format!("{e:#}"), path = %run_logger.path().display(), "Failed to write run log");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SearchProvider for CountingProvider {
        async fn search(&self, _query: &str, _num_results: usize) -> Result<Vec<SearchResult>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(anyhow::anyhow!("search backend unreachable").into())
        }
    }

    fn config() -> Config {
        Config::from_lookup(|key| match key {
            "SERPAPI_API_KEY" => Some("serp".into()),
            "OPENAI_API_KEY" => Some("oai".into()),
            _ => None,
        })
        .unwrap()
    }

    fn assistant() -> (ResearchAssistant, Arc<CountingProvider>) {
        let provider = Arc::new(CountingProvider::default());
        let assistant = ResearchAssistant::with_search_provider(config(), provider.clone()).unwrap();
        (assistant, provider)
    }

    #[tokio::test]
    async fn invalid_topic_never_reaches_search() {
        let (assistant, provider) = assistant();
        let err = assistant
            .research(&ResearchRequest::new("   "))
            .await
            .unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unconfigured_provider_never_reaches_search() {
        let (assistant, provider) = assistant();
        let err = assistant
            .research(&ResearchRequest::new("Rust").with_model("gemini"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid model provider. Choose from: openai");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn search_failure_is_upstream_and_aborts() {
        let (assistant, provider) = assistant();
        let err = assistant
            .research(&ResearchRequest::new("Rust"))
            .await
            .unwrap_err();
        assert!(matches!(err, ResearchError::Upstream(_)));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn source_summary_drops_metadata() {
        let mut result = SearchResult::new("t", "https://x.example", "s");
        result.relevance_score = Some(1.0);
        let summary = serde_json::to_value(SourceSummary::from(&result)).unwrap();
        assert_eq!(summary, json!({"title": "t", "url": "https://x.example", "snippet": "s"}));
    }
}
