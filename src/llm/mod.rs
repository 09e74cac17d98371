pub mod anthropic;
pub mod factory;
pub mod gemini;
pub mod openai;

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ResearchError;

pub use anthropic::AnthropicClient;
pub use factory::{ModelFactory, ModelSettings, ProviderEndpoint, ProviderRegistry};
pub use gemini::GeminiClient;
pub use openai::OpenAiClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    #[serde(rename = "openai")]
    OpenAi,
    Gemini,
    Anthropic,
}

impl ModelProvider {
    pub const ALL: [ModelProvider; 3] = [Self::OpenAi, Self::Gemini, Self::Anthropic];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Gemini => "gemini",
            Self::Anthropic => "anthropic",
        }
    }

    pub fn api_key_var(&self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Gemini => "GEMINI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

impl fmt::Display for ModelProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelProvider {
    type Err = ResearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ResearchError::UnsupportedProvider {
                name: s.to_string(),
                choices: Self::ALL.map(|p| p.as_str()).join(", "),
            })
    }
}

#[derive(Debug, Clone, Default)]
pub struct LlmResponse {
    pub text: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// A text-completion backend. Implementations perform one blocking round
/// trip per call and never retry.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    fn provider(&self) -> ModelProvider;

    fn model_name(&self) -> &str;

    async fn complete(&self, system_prompt: Option<&str>, user_message: &str)
        -> Result<LlmResponse>;
}
