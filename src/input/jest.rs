use std::path::PathBuf;

use serde::Deserialize;

use crate::models::{CaseResult, CaseStatus, Counts, FileResult, TestRunResult};

// --- Jest aggregated-result deserialization types ---
//
// Accepts both the `jest --json` output and the in-process reporter shape
// (`testFilePath` / nested `testResults`).

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JestAggregate {
    #[serde(default)]
    num_failed_tests: Option<usize>,
    #[serde(default)]
    num_passed_tests: Option<usize>,
    #[serde(default)]
    num_pending_tests: Option<usize>,
    #[serde(default)]
    num_todo_tests: Option<usize>,
    #[serde(default)]
    test_results: Vec<JestFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JestFile {
    #[serde(alias = "testFilePath")]
    name: PathBuf,
    #[serde(default, alias = "testResults")]
    assertion_results: Vec<JestAssertion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JestAssertion {
    #[serde(default)]
    ancestor_titles: Vec<String>,
    title: String,
    status: String,
    #[serde(default)]
    failure_messages: Vec<String>,
    #[serde(default)]
    location: Option<JestLocation>,
}

#[derive(Debug, Deserialize)]
struct JestLocation {
    line: u32,
}

impl JestAggregate {
    /// Counts as the framework reported them, when it reported all of them.
    pub fn reported_counts(&self) -> Option<Counts> {
        Some(Counts {
            failed: self.num_failed_tests?,
            skipped: self.num_pending_tests? + self.num_todo_tests.unwrap_or(0),
            passed: self.num_passed_tests?,
        })
    }

    pub fn into_run_result(self) -> TestRunResult {
        TestRunResult {
            files: self
                .test_results
                .into_iter()
                .map(JestFile::into_file_result)
                .collect(),
        }
    }
}

impl JestFile {
    fn into_file_result(self) -> FileResult {
        FileResult {
            path: self.name,
            cases: self
                .assertion_results
                .into_iter()
                .map(JestAssertion::into_case_result)
                .collect(),
        }
    }
}

impl JestAssertion {
    fn into_case_result(self) -> CaseResult {
        let status = CaseStatus::parse(&self.status);
        let failure_messages = if status == CaseStatus::Failed {
            self.failure_messages.iter().map(|m| strip_ansi(m)).collect()
        } else {
            Vec::new()
        };

        CaseResult {
            status,
            ancestor_titles: self.ancestor_titles,
            title: self.title,
            failure_messages,
            line: self.location.map(|l| l.line),
        }
    }
}

/// Strip ANSI escape sequences from a string.
pub fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // Skip until we hit a letter (end of escape sequence)
            for c2 in chars.by_ref() {
                if c2.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}
