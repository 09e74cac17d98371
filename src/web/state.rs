use std::sync::Arc;

use crate::assistant::ResearchAssistant;

/// Shared by every handler. Holds no per-request data.
#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<ResearchAssistant>,
}

impl AppState {
    pub fn new(assistant: ResearchAssistant) -> Self {
        Self {
            assistant: Arc::new(assistant),
        }
    }
}
