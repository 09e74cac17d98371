//! Local stand-ins for SerpAPI and the three LLM providers.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{Request, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use research_assistant::web::{create_app, AppState};
use research_assistant::{Config, ResearchAssistant};

pub const ANALYSIS_TEXT: &str = "MOCK ANALYSIS: sources are credible";
pub const REPORT_TEXT: &str = "MOCK REPORT with [Source 1]";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub route: String,
    pub body: Value,
}

#[derive(Clone)]
struct MockState {
    organic_results: Option<usize>,
    llm_status: StatusCode,
    recorded: Arc<Mutex<Vec<Recorded>>>,
}

impl MockState {
    fn record(&self, route: &str, body: Value) {
        self.recorded.lock().unwrap().push(Recorded {
            route: route.to_string(),
            body,
        });
    }

    /// Analysis prompts get the analysis text back, everything else the report.
    fn reply_for(prompt: &str) -> &'static str {
        if prompt.starts_with("Analyze the following search results") {
            ANALYSIS_TEXT
        } else {
            REPORT_TEXT
        }
    }
}

pub struct MockUpstream {
    pub base_url: String,
    recorded: Arc<Mutex<Vec<Recorded>>>,
}

impl MockUpstream {
    pub fn requests(&self) -> Vec<Recorded> {
        self.recorded.lock().unwrap().clone()
    }

    pub fn requests_to(&self, route: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.route == route)
            .collect()
    }

    pub fn llm_prompts(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|r| r.route != "serp")
            .map(|r| prompt_of(&r))
            .collect()
    }
}

fn prompt_of(recorded: &Recorded) -> String {
    let body = &recorded.body;
    let text = match recorded.route.as_str() {
        "openai" | "anthropic" => &body["messages"][0]["content"],
        "gemini" => &body["contents"][0]["parts"][0]["text"],
        _ => &Value::Null,
    };
    text.as_str().unwrap_or_default().to_string()
}

async fn serp(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    state.record("serp", json!(params));
    let Some(n) = state.organic_results else {
        return Json(json!({ "search_metadata": { "status": "Success" } }));
    };
    let results: Vec<Value> = (1..=n)
        .map(|i| {
            json!({
                "position": i,
                "title": format!("Quantum result {i}"),
                "link": format!("https://source{i}.example/article"),
                "snippet": format!("Snippet number {i}"),
            })
        })
        .collect();
    Json(json!({ "organic_results": results }))
}

async fn openai(State(state): State<MockState>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    state.record("openai", body.clone());
    if !state.llm_status.is_success() {
        return (state.llm_status, Json(json!({ "error": { "message": "mock failure" } })));
    }
    let prompt = body["messages"][0]["content"].as_str().unwrap_or_default();
    let reply = json!({
        "choices": [{ "message": { "role": "assistant", "content": MockState::reply_for(prompt) } }],
        "usage": { "prompt_tokens": 100, "completion_tokens": 20 }
    });
    (StatusCode::OK, Json(reply))
}

async fn anthropic(State(state): State<MockState>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    state.record("anthropic", body.clone());
    if !state.llm_status.is_success() {
        return (state.llm_status, Json(json!({ "type": "error" })));
    }
    let prompt = body["messages"][0]["content"].as_str().unwrap_or_default();
    let reply = json!({
        "content": [{ "type": "text", "text": MockState::reply_for(prompt) }],
        "usage": { "input_tokens": 80, "output_tokens": 10 }
    });
    (StatusCode::OK, Json(reply))
}

async fn gemini(
    State(state): State<MockState>,
    Path(model_action): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.record("gemini", json!({ "path": model_action, "contents": body["contents"].clone() }));
    if !state.llm_status.is_success() {
        return (state.llm_status, Json(json!({ "error": { "code": 500 } })));
    }
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap_or_default();
    let reply = json!({
        "candidates": [{ "content": { "role": "model", "parts": [{ "text": MockState::reply_for(prompt) }] } }],
        "usageMetadata": { "promptTokenCount": 50, "candidatesTokenCount": 5 }
    });
    (StatusCode::OK, Json(reply))
}

pub struct MockOptions {
    /// `None` answers without an `organic_results` key.
    pub organic_results: Option<usize>,
    pub llm_status: StatusCode,
}

impl Default for MockOptions {
    fn default() -> Self {
        Self {
            organic_results: Some(6),
            llm_status: StatusCode::OK,
        }
    }
}

pub async fn spawn_upstream(options: MockOptions) -> MockUpstream {
    let recorded = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        organic_results: options.organic_results,
        llm_status: options.llm_status,
        recorded: recorded.clone(),
    };

    let app = Router::new()
        .route("/search.json", get(serp))
        .route("/v1/chat/completions", post(openai))
        .route("/v1/messages", post(anthropic))
        .route("/v1beta/models/{model_action}", post(gemini))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockUpstream {
        base_url: format!("http://{addr}"),
        recorded,
    }
}

/// Configuration pointing every backend at `upstream`. `extra` entries are
/// added on top and may override defaults.
pub fn config_for(upstream: &MockUpstream, extra: &[(&str, &str)]) -> Config {
    let base = &upstream.base_url;
    let mut vars: HashMap<String, String> = HashMap::from([
        ("SERPAPI_API_KEY".to_string(), "serp-test".to_string()),
        ("SERPAPI_BASE_URL".to_string(), base.clone()),
        ("OPENAI_API_KEY".to_string(), "sk-test".to_string()),
        ("OPENAI_BASE_URL".to_string(), format!("{base}/v1/chat/completions")),
        ("GEMINI_API_KEY".to_string(), "gem-test".to_string()),
        ("GEMINI_MODEL".to_string(), "gemini-test".to_string()),
        ("GEMINI_BASE_URL".to_string(), format!("{base}/v1beta")),
        ("ANTHROPIC_API_KEY".to_string(), "ant-test".to_string()),
        ("ANTHROPIC_BASE_URL".to_string(), format!("{base}/v1/messages")),
    ]);
    for (key, value) in extra {
        vars.insert(key.to_string(), value.to_string());
    }
    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

pub fn app_for(config: Config) -> Router {
    let assistant = ResearchAssistant::new(config).unwrap();
    create_app(AppState::new(assistant))
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn extract_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
