use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{LanguageModel, LlmResponse, ModelProvider, ModelSettings};

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
    settings: ModelSettings,
}

#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Serialize)]
struct ChatCompletionRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

impl OpenAiClient {
    /// `endpoint` is the full chat-completions URL, so any OpenAI-compatible
    /// gateway can be used.
    pub fn new(api_key: &str, endpoint: &str, model: &str, settings: ModelSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            settings,
        }
    }

    fn build_request(&self, system_prompt: Option<&str>, user_message: &str) -> ChatCompletionRequest {
        let mut messages = Vec::new();
        if let Some(system) = system_prompt {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system.to_string(),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: user_message.to_string(),
        });

        ChatCompletionRequest {
            model: self.model.clone(),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            messages,
        }
    }
}

fn into_llm_response(api_response: ChatCompletionResponse) -> LlmResponse {
    let text = api_response
        .choices
        .first()
        .and_then(|c| c.message.content.as_deref())
        .unwrap_or("")
        .to_string();
    let (input_tokens, output_tokens) = api_response
        .usage
        .map(|u| (u.prompt_tokens, u.completion_tokens))
        .unwrap_or_default();

    LlmResponse {
        text,
        input_tokens,
        output_tokens,
    }
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    fn provider(&self) -> ModelProvider {
        ModelProvider::OpenAi
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, system_prompt: Option<&str>, user_message: &str) -> Result<LlmResponse> {
        let request = self.build_request(system_prompt, user_message);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", &self.api_key))
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to OpenAI API")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI API error ({}): {}", status, body);
        }

        let api_response: ChatCompletionResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI API response")?;

        Ok(into_llm_response(api_response))
    }
}
