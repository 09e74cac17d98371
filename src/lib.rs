//! Web research assistant: searches the web for a topic and turns the results
//! into a report through a two-stage LLM chain.

pub mod assistant;
pub mod config;
pub mod error;
pub mod instrumentation;
pub mod llm;
pub mod research;
pub mod search;
pub mod web;

pub use assistant::{ResearchAssistant, ResearchReport, ResearchRequest};
pub use config::Config;
pub use error::{ResearchError, Result};

/// Installs the global tracing subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_logging(json: bool, verbose: bool) {
    let default_filter = if verbose {
        "research_assistant=debug,tower_http=debug,info"
    } else {
        "info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
