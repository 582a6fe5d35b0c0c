use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::status::CaseStatus;

/// Per-bucket case counts. `total` is always the sum of the three buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub failed: usize,
    pub skipped: usize,
    pub passed: usize,
}

impl Counts {
    pub fn total(&self) -> usize {
        self.failed + self.skipped + self.passed
    }

    fn record(&mut self, status: CaseStatus) {
        match status {
            CaseStatus::Failed => self.failed += 1,
            CaseStatus::Passed => self.passed += 1,
            CaseStatus::Pending | CaseStatus::Skipped => self.skipped += 1,
        }
    }
}

impl std::ops::Add for Counts {
    type Output = Counts;

    fn add(self, rhs: Counts) -> Counts {
        Counts {
            failed: self.failed + rhs.failed,
            skipped: self.skipped + rhs.skipped,
            passed: self.passed + rhs.passed,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseResult {
    pub status: CaseStatus,
    /// Enclosing group titles, outermost first.
    pub ancestor_titles: Vec<String>,
    pub title: String,
    pub failure_messages: Vec<String>,
    /// Line where the case is defined, if the framework reported it.
    pub line: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileResult {
    pub path: PathBuf,
    pub cases: Vec<CaseResult>,
}

impl FileResult {
    pub fn counts(&self) -> Counts {
        let mut counts = Counts::default();
        for case in &self.cases {
            counts.record(case.status);
        }
        counts
    }

    pub fn failed_cases(&self) -> impl Iterator<Item = &CaseResult> {
        self.cases
            .iter()
            .filter(|c| c.status == CaseStatus::Failed)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestRunResult {
    pub files: Vec<FileResult>,
}

impl TestRunResult {
    pub fn counts(&self) -> Counts {
        self.files
            .iter()
            .map(FileResult::counts)
            .fold(Counts::default(), |acc, c| acc + c)
    }

    pub fn num_failed(&self) -> usize {
        self.counts().failed
    }

    /// Append another run's files after this one's, keeping both orders.
    pub fn merge(&mut self, other: TestRunResult) {
        self.files.extend(other.files);
    }
}
