use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResearchError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Unsupported model provider: {name}. Choose from: {choices}")]
    UnsupportedProvider { name: String, choices: String },

    #[error("Invalid research depth: {0}")]
    InvalidDepth(String),

    #[error("{0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{0:#}")]
    Upstream(#[from] anyhow::Error),
}

impl ResearchError {
    /// True for errors caused by the caller's input rather than by the
    /// service or its backends.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_)
                | Self::UnsupportedProvider { .. }
                | Self::InvalidDepth(_)
                | Self::Validation(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ResearchError>;
