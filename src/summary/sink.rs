use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

pub const SUMMARY_ENV_VAR: &str = "GITHUB_STEP_SUMMARY";

/// Destination of the finished summary document.
#[async_trait]
pub trait SummarySink: Send + Sync {
    /// Persist the whole document in one call.
    async fn write(&mut self, document: &str) -> Result<()>;
}

/// Writes to the job-summary file, appending unless `overwrite` is set.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: Option<PathBuf>,
    overwrite: bool,
}

impl FileSink {
    /// A missing path only fails at write time.
    pub fn new(path: Option<PathBuf>, overwrite: bool) -> Self {
        Self { path, overwrite }
    }
}

#[async_trait]
impl SummarySink for FileSink {
    async fn write(&mut self, document: &str) -> Result<()> {
        let Some(path) = self.path.as_ref() else {
            anyhow::bail!(
                "unable to find environment variable for ${}; check that the job supports summaries",
                SUMMARY_ENV_VAR
            );
        };

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .append(!self.overwrite)
            .truncate(self.overwrite)
            .open(path)
            .await
            .with_context(|| format!("failed to open summary file {}", path.display()))?;

        file.write_all(document.as_bytes())
            .await
            .with_context(|| format!("failed to write summary file {}", path.display()))?;
        file.flush().await.context("failed to flush summary file")?;

        tracing::debug!(path = %path.display(), bytes = document.len(), "summary written");
        Ok(())
    }
}

/// Prints the document, for previewing a report outside CI.
#[derive(Debug, Default)]
pub struct StdoutSink;

#[async_trait]
impl SummarySink for StdoutSink {
    async fn write(&mut self, document: &str) -> Result<()> {
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(document.as_bytes())
            .await
            .context("failed to write summary to stdout")?;
        stdout.flush().await?;
        Ok(())
    }
}
