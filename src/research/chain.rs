use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use serde_json::json;
use tracing::{error, info};

use super::prompts::{format_sources, render, synthesis_template, SOURCE_ANALYSIS_TEMPLATE};
use super::{Depth, ResearchOutput, TokenUsage};
use crate::error::Result;
use crate::instrumentation::SessionLog;
use crate::llm::{LanguageModel, LlmResponse};
use crate::search::SearchResult;

/// Two-stage pipeline: source analysis, then depth-specific synthesis over
/// the analysis.
pub struct ResearchChainManager {
    llm: Arc<dyn LanguageModel>,
}

impl ResearchChainManager {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm }
    }

    pub async fn analyze_sources(&self, formatted_sources: &str) -> anyhow::Result<LlmResponse> {
        let prompt = render(SOURCE_ANALYSIS_TEMPLATE, &[("sources", formatted_sources)]);
        self.llm
            .complete(None, &prompt)
            .await
            .context("Source analysis failed")
    }

    pub async fn synthesize(
        &self,
        depth: Depth,
        source_analysis: &str,
        query: &str,
        prompt: &str,
    ) -> anyhow::Result<LlmResponse> {
        let message = render(
            synthesis_template(depth),
            &[
                ("prompt", prompt),
                ("source_analysis", source_analysis),
                ("query", query),
            ],
        );
        self.llm
            .complete(None, &message)
            .await
            .with_context(|| format!("{depth} synthesis failed"))
    }

    /// Runs both stages. Nothing is kept from a run where either stage fails.
    pub async fn process_research(
        &self,
        query: &str,
        prompt: &str,
        sources: &[SearchResult],
        depth: Depth,
        log: &mut SessionLog,
    ) -> Result<ResearchOutput> {
        let start = Instant::now();
        info!(
            query,
            depth = %depth,
            provider = %self.llm.provider(),
            "Starting research query"
        );

        match self.run_stages(query, prompt, sources, depth, log).await {
            Ok((result, usage)) => {
                let duration = start.elapsed().as_secs_f64();
                info!(duration_secs = duration, "Research complete");
                Ok(ResearchOutput {
                    result,
                    duration,
                    depth,
                    usage,
                })
            }
            Err(e) => {
                error!(error = %format!("{e:#}"), "Research processing failed");
                log.log_step("research_failed", json!({ "error": format!("{e:#}") }));
                Err(e.into())
            }
        }
    }

    async fn run_stages(
        &self,
        query: &str,
        prompt: &str,
        sources: &[SearchResult],
        depth: Depth,
        log: &mut SessionLog,
    ) -> anyhow::Result<(String, TokenUsage)> {
        let mut usage = TokenUsage::default();

        let format_start = Instant::now();
        let formatted_sources = format_sources(sources);
        info!(
            count = sources.len(),
            elapsed_ms = format_start.elapsed().as_millis() as u64,
            "Formatted sources for analysis"
        );
        log.log_step("sources_formatted", json!({ "count": sources.len() }));

        let stage_start = Instant::now();
        let analysis = self.analyze_sources(&formatted_sources).await?;
        usage.add(analysis.input_tokens, analysis.output_tokens);
        log.log_step(
            "source_analysis_complete",
            json!({
                "latency_ms": stage_start.elapsed().as_millis() as u64,
                "output_tokens": analysis.output_tokens,
            }),
        );

        let stage_start = Instant::now();
        let synthesis = self
            .synthesize(depth, &analysis.text, query, prompt)
            .await?;
        usage.add(synthesis.input_tokens, synthesis.output_tokens);
        log.log_step(
            "synthesis_complete",
            json!({
                "depth": depth,
                "latency_ms": stage_start.elapsed().as_millis() as u64,
                "output_tokens": synthesis.output_tokens,
            }),
        );

        Ok((synthesis.text, usage))
    }
}
