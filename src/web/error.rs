use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::ResearchError;

const GENERIC_FAILURE: &str = "An unexpected error occurred during research. Please try again.";

/// HTTP rendering of [`ResearchError`]: caller mistakes become `400 {error}`,
/// everything else `500 {error, details}`.
#[derive(Debug)]
pub struct ApiError(pub ResearchError);

impl From<ResearchError> for ApiError {
    fn from(err: ResearchError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.0.is_client_error() {
            let body = json!({ "error": self.0.to_string() });
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }

        let body = json!({
            "error": GENERIC_FAILURE,
            "details": self.0.to_string(),
        });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let response = ApiError(ResearchError::Validation("nope".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn upstream_maps_to_internal_error() {
        let response = ApiError(anyhow::anyhow!("boom").into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn configuration_maps_to_internal_error() {
        let response = ApiError(ResearchError::Configuration("missing".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
