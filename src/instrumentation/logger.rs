use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::LogEntry;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunLog {
    pub id: String,
    pub timestamp: String,
    pub topic: String,
    pub depth: String,
    pub provider: String,
    pub model: String,
    pub num_sources: usize,
    pub duration_secs: f64,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub steps: Vec<LogEntry>,
}

impl RunLog {
    pub fn total_tokens(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }

    pub fn summary(&self) -> String {
        format!(
            "Depth: {} | Provider: {} ({}) | Sources: {} | Total latency: {:.1}s | Tokens used by LLM: {}",
            self.depth,
            self.provider,
            self.model,
            self.num_sources,
            self.duration_secs,
            self.total_tokens(),
        )
    }
}

/// Appends completed runs to `runs.jsonl` in a directory.
pub struct RunLogger {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl RunLogger {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).context("Failed to create logs directory")?;
        Ok(Self {
            path: dir.join("runs.jsonl"),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, run_log: &RunLog) -> Result<()> {
        let json = serde_json::to_string(run_log).context("Failed to serialize run log")?;

        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .context("Failed to open log file")?;
        writeln!(file, "{}", json).context("Failed to write log")?;

        Ok(())
    }
}
