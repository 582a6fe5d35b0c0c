use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    #[default]
    Pending,
    Passed,
    Failed,
    Skipped,
}

impl CaseStatus {
    /// Map a framework status string. Unknown states count as pending.
    pub fn parse(state: &str) -> Self {
        match state {
            "passed" => CaseStatus::Passed,
            "failed" => CaseStatus::Failed,
            "skipped" | "todo" | "disabled" => CaseStatus::Skipped,
            _ => CaseStatus::Pending,
        }
    }
}
