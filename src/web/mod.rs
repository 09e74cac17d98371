pub mod error;
pub mod handlers;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use server::ResearchServer;
pub use state::AppState;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/providers", get(handlers::providers))
        .route("/research", post(handlers::research))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
