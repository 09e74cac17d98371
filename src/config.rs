use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{ResearchError, Result};
use crate::llm::{ModelProvider, ProviderEndpoint, ProviderRegistry};

#[derive(Debug, Clone)]
pub struct Config {
    pub serpapi_api_key: String,
    pub serpapi_base_url: String,
    /// Keys for the LLM providers that are configured, in provider order.
    pub api_keys: BTreeMap<ModelProvider, String>,
    pub registry: ProviderRegistry,
    pub temperature: f32,
    pub max_tokens: u32,
    pub num_results: usize,
    pub host: String,
    pub port: u16,
    pub log_dir: Option<PathBuf>,
    pub log_json: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values are
    /// treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let serpapi_api_key = get("SERPAPI_API_KEY").ok_or_else(|| {
            ResearchError::Configuration("SERPAPI_API_KEY must be set".into())
        })?;

        let mut api_keys = BTreeMap::new();
        for provider in ModelProvider::ALL {
            if let Some(key) = get(provider.api_key_var()) {
                api_keys.insert(provider, key);
            }
        }
        if api_keys.is_empty() {
            return Err(ResearchError::Configuration(
                "At least one AI provider API key must be set (OPENAI_API_KEY, GEMINI_API_KEY, or ANTHROPIC_API_KEY)".into(),
            ));
        }

        let defaults = ProviderRegistry::default();
        let endpoint = |prefix: &str, fallback: &ProviderEndpoint| ProviderEndpoint {
            model: get(&format!("{prefix}_MODEL")).unwrap_or_else(|| fallback.model.clone()),
            base_url: get(&format!("{prefix}_BASE_URL"))
                .unwrap_or_else(|| fallback.base_url.clone()),
        };
        let registry = ProviderRegistry {
            openai: endpoint("OPENAI", &defaults.openai),
            gemini: endpoint("GEMINI", &defaults.gemini),
            anthropic: endpoint("ANTHROPIC", &defaults.anthropic),
        };

        Ok(Self {
            serpapi_api_key,
            serpapi_base_url: get("SERPAPI_BASE_URL")
                .unwrap_or_else(|| "https://serpapi.com".into()),
            api_keys,
            registry,
            temperature: parse_var(&get, "LLM_TEMPERATURE", 0.7)?,
            max_tokens: parse_var(&get, "LLM_MAX_TOKENS", 1500)?,
            num_results: parse_var(&get, "SEARCH_NUM_RESULTS", 4)?,
            host: get("HOST").unwrap_or_else(|| "127.0.0.1".into()),
            port: parse_var(&get, "PORT", 5004)?,
            log_dir: get("RESEARCH_LOG_DIR").map(PathBuf::from),
            log_json: get("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json")),
        })
    }

    /// Providers with a configured key, in registry order.
    pub fn available_providers(&self) -> Vec<ModelProvider> {
        self.api_keys.keys().copied().collect()
    }

    pub fn api_key(&self, provider: ModelProvider) -> Option<&str> {
        self.api_keys.get(&provider).map(String::as_str)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ResearchError::Configuration(format!("{key} must be a number"))),
        None => Ok(default),
    }
}
