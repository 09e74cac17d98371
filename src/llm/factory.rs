use std::sync::Arc;

use tracing::debug;

use super::{AnthropicClient, GeminiClient, LanguageModel, ModelProvider, OpenAiClient};
use crate::error::Result;

/// Generation parameters shared by every provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelSettings {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 1500,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderEndpoint {
    pub model: String,
    pub base_url: String,
}

/// Where each provider lives and which model it serves. Built once at startup
/// and handed to [`ModelFactory`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRegistry {
    pub openai: ProviderEndpoint,
    pub gemini: ProviderEndpoint,
    pub anthropic: ProviderEndpoint,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self {
            openai: ProviderEndpoint {
                model: "gpt-4o-mini".into(),
                base_url: "https://api.openai.com/v1/chat/completions".into(),
            },
            gemini: ProviderEndpoint {
                model: "gemini-2.0-flash".into(),
                base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            },
            anthropic: ProviderEndpoint {
                model: "claude-3-5-haiku-latest".into(),
                base_url: "https://api.anthropic.com/v1/messages".into(),
            },
        }
    }
}

impl ProviderRegistry {
    pub fn endpoint(&self, provider: ModelProvider) -> &ProviderEndpoint {
        match provider {
            ModelProvider::OpenAi => &self.openai,
            ModelProvider::Gemini => &self.gemini,
            ModelProvider::Anthropic => &self.anthropic,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModelFactory {
    registry: ProviderRegistry,
}

impl ModelFactory {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Resolves `provider` by name and constructs its client. No network
    /// traffic happens until the client is first used.
    pub fn create_model(
        &self,
        provider: &str,
        api_key: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<Arc<dyn LanguageModel>> {
        let provider: ModelProvider = provider.parse()?;
        Ok(self.build(
            provider,
            api_key,
            ModelSettings {
                temperature,
                max_tokens,
            },
        ))
    }

    pub fn build(
        &self,
        provider: ModelProvider,
        api_key: &str,
        settings: ModelSettings,
    ) -> Arc<dyn LanguageModel> {
        let endpoint = self.registry.endpoint(provider);
        debug!(provider = %provider, model = %endpoint.model, "Constructing LLM client");

        match provider {
            ModelProvider::OpenAi => Arc::new(OpenAiClient::new(
                api_key,
                &endpoint.base_url,
                &endpoint.model,
                settings,
            )),
            ModelProvider::Gemini => Arc::new(GeminiClient::new(
                api_key,
                &endpoint.base_url,
                &endpoint.model,
                settings,
            )),
            ModelProvider::Anthropic => Arc::new(AnthropicClient::new(
                api_key,
                &endpoint.base_url,
                &endpoint.model,
                settings,
            )),
        }
    }
}
