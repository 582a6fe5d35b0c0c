pub mod github;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::TestRunResult;

pub use github::GithubReporter;

/// Lifecycle hooks a test host drives, in order: start, complete, last error.
#[async_trait]
pub trait Reporter: Send {
    /// Called before any test runs.
    fn on_run_start(&mut self);

    /// Called once with the finished run. The result is shared with other
    /// reporters and must not be modified.
    async fn on_run_complete(&mut self, result: &TestRunResult) -> Result<()>;

    /// Reporter-side failure that should fail the run, if any.
    fn last_error(&self) -> Option<&anyhow::Error>;

    /// Display name for this reporter (e.g., "GitHub summary").
    fn name(&self) -> &str;
}
