pub mod chain;
pub mod prompts;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ResearchError;

pub use chain::ResearchChainManager;

/// How much report the caller wants back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Depth {
    #[default]
    Brief,
    Detailed,
    Comprehensive,
}

impl Depth {
    pub const ALL: [Depth; 3] = [Self::Brief, Self::Detailed, Self::Comprehensive];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Brief => "brief",
            Self::Detailed => "detailed",
            Self::Comprehensive => "comprehensive",
        }
    }

    pub fn choices() -> String {
        Self::ALL.map(|d| d.as_str()).join(", ")
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Depth {
    type Err = ResearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == normalized)
            .ok_or_else(|| ResearchError::InvalidDepth(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn add(&mut self, input_tokens: u32, output_tokens: u32) {
        self.input_tokens += input_tokens;
        self.output_tokens += output_tokens;
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResearchOutput {
    pub result: String,
    /// Wall-clock seconds across both chain stages.
    pub duration: f64,
    pub depth: Depth,
    pub usage: TokenUsage,
}
