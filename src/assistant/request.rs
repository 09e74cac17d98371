use serde::Deserialize;

use crate::error::{ResearchError, Result};
use crate::llm::ModelProvider;
use crate::research::Depth;

pub const MAX_TOPIC_LENGTH: usize = 200;

/// Body of `POST /research`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResearchRequest {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub depth: Option<String>,
    #[serde(default, alias = "provider")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub topic: String,
    pub depth: Depth,
    pub provider: ModelProvider,
}

impl ResearchRequest {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            ..Default::default()
        }
    }

    pub fn with_depth(mut self, depth: impl Into<String>) -> Self {
        self.depth = Some(depth.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Checks topic, depth and provider, in that order. `available` is the
    /// list of configured providers; the first one is the default.
    pub fn validate(&self, available: &[ModelProvider]) -> Result<ValidatedRequest> {
        let topic = sanitize_input(&self.topic, MAX_TOPIC_LENGTH)
            .trim()
            .to_string();
        if topic.is_empty() {
            return Err(ResearchError::Validation(
                "Topic is required and must contain valid characters".into(),
            ));
        }

        let depth = match self.depth.as_deref() {
            None => Depth::default(),
            Some(raw) => raw.parse().map_err(|_| {
                ResearchError::Validation(format!(
                    "Invalid depth. Choose from: {}",
                    Depth::choices()
                ))
            })?,
        };

        let invalid_provider = || {
            let choices: Vec<&str> = available.iter().map(|p| p.as_str()).collect();
            ResearchError::Validation(format!(
                "Invalid model provider. Choose from: {}",
                choices.join(", ")
            ))
        };
        let provider = match self.model.as_deref() {
            None => available.first().copied(),
            Some(name) => available.iter().copied().find(|p| p.as_str() == name),
        }
        .ok_or_else(invalid_provider)?;

        Ok(ValidatedRequest {
            topic,
            depth,
            provider,
        })
    }
}

/// Drops everything except ASCII letters, digits, whitespace and `.,!?-`, then
/// truncates to `max_length` characters.
pub fn sanitize_input(input: &str, max_length: usize) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || ".,!?-".contains(*c))
        .take(max_length)
        .collect()
}
