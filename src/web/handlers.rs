use axum::extract::State;
use axum::Json;
use serde::Serialize;

use super::{ApiError, AppState};
use crate::assistant::{ResearchReport, ResearchRequest};
use crate::llm::ModelProvider;
use crate::research::Depth;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
pub struct ProvidersResponse {
    providers: Vec<ModelProvider>,
    depths: Vec<Depth>,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Configured providers (the first is the default) and accepted depths.
pub async fn providers(State(state): State<AppState>) -> Json<ProvidersResponse> {
    Json(ProvidersResponse {
        providers: state.assistant.available_providers(),
        depths: Depth::ALL.to_vec(),
    })
}

pub async fn research(
    State(state): State<AppState>,
    Json(request): Json<ResearchRequest>,
) -> Result<Json<ResearchReport>, ApiError> {
    let report = state.assistant.research(&request).await?;
    Ok(Json(report))
}
