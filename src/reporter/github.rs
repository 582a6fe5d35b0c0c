use anyhow::Result;
use async_trait::async_trait;

use crate::config::ReportConfig;
use crate::context::ReportContext;
use crate::models::{CaseResult, Counts, FileResult, TestRunResult};
use crate::summary::{self, Summary, SummarySink};

use super::Reporter;

const TABLE_HEADER: [&str; 5] = ["Test", "Failed", "Skipped", "Passed", "Total"];

/// Renders a finished run into the GitHub job summary.
///
/// Outside CI nothing is written. In CI the table and failure details are
/// always rendered; permanent links only appear when the context has them.
pub struct GithubReporter {
    context: ReportContext,
    config: ReportConfig,
    summary: Summary,
}

impl GithubReporter {
    pub fn new(context: ReportContext, config: ReportConfig, sink: Box<dyn SummarySink>) -> Self {
        if context.ci && context.links.is_none() {
            tracing::info!("CI link context incomplete; report will use plain paths");
        }
        Self {
            context,
            config,
            summary: Summary::new(sink),
        }
    }

    /// Row label: the relative path, linked when possible.
    fn file_label(&self, file: &FileResult) -> String {
        let display = self.context.display_path(&file.path);
        match self.context.permalink(&file.path, None) {
            Some(url) => summary::link(&display, &url),
            None => display,
        }
    }

    /// Summary line of a failure block: file, groups, then the case title.
    fn case_label(&self, display: &str, case: &CaseResult) -> String {
        std::iter::once(display)
            .chain(case.ancestor_titles.iter().map(String::as_str))
            .chain(std::iter::once(case.title.as_str()))
            .collect::<Vec<_>>()
            .join(&self.config.separator)
    }

    /// Link (or plain location) to where the case is defined.
    fn case_reference(&self, file: &FileResult, display: &str, case: &CaseResult) -> String {
        let location = match case.line {
            Some(line) => format!("{}:{}", display, line),
            None => display.to_string(),
        };
        match self.context.permalink(&file.path, case.line) {
            Some(url) => summary::link(&location, &url),
            None => format!("`{}`", location),
        }
    }

    fn render_table(&mut self, result: &TestRunResult) {
        let mut rows: Vec<Vec<String>> = Vec::with_capacity(result.files.len() + 2);
        rows.push(TABLE_HEADER.iter().map(|h| h.to_string()).collect());
        for file in &result.files {
            let mut row = vec![self.file_label(file)];
            row.extend(count_cells(file.counts()));
            rows.push(row);
        }

        let mut total = vec![summary::bold("Total")];
        total.extend(count_cells(result.counts()).iter().map(|c| summary::bold(c)));
        rows.push(total);

        self.summary.add_table(&rows);
    }

    fn render_failures(&mut self, result: &TestRunResult) {
        let limit = self.config.max_failures.unwrap_or(usize::MAX);
        let mut blocks = Vec::new();
        let mut omitted = 0;

        for file in &result.files {
            let display = self.context.display_path(&file.path);
            for case in file.failed_cases() {
                if blocks.len() < limit {
                    blocks.push((
                        self.case_label(&display, case),
                        self.case_reference(file, &display, case),
                        case.failure_messages.join("\n"),
                    ));
                } else {
                    omitted += 1;
                }
            }
        }

        self.summary.add_heading("Failed Tests", 2);
        for (label, reference, messages) in &blocks {
            self.summary.add_details(label, |body| {
                body.add_raw(reference)
                    .add_eol()
                    .add_eol()
                    .add_code_block(messages, None);
            });
        }
        if omitted > 0 {
            self.summary
                .add_raw(&format!("_{} more failed tests not shown._", omitted))
                .add_eol()
                .add_eol();
        }
    }

    fn render(&mut self, result: &TestRunResult) {
        self.summary.add_heading(&self.config.title, 1);
        self.summary.add_heading("Summary", 2);
        self.render_table(result);

        if result.num_failed() > 0 {
            self.render_failures(result);
        }
    }
}

fn count_cells(counts: Counts) -> [String; 4] {
    [
        counts.failed.to_string(),
        counts.skipped.to_string(),
        counts.passed.to_string(),
        counts.total().to_string(),
    ]
}

#[async_trait]
impl Reporter for GithubReporter {
    fn on_run_start(&mut self) {
        // do nothing
    }

    async fn on_run_complete(&mut self, result: &TestRunResult) -> Result<()> {
        if !self.context.ci {
            tracing::info!("not running in CI; skipping job summary");
            return Ok(());
        }

        let counts = result.counts();
        tracing::debug!(
            files = result.files.len(),
            failed = counts.failed,
            skipped = counts.skipped,
            passed = counts.passed,
            "rendering job summary"
        );

        self.render(result);
        self.summary.write().await
    }

    fn last_error(&self) -> Option<&anyhow::Error> {
        None
    }

    fn name(&self) -> &str {
        "GitHub summary"
    }
}
