pub mod result;
pub mod status;

pub use result::{CaseResult, Counts, FileResult, TestRunResult};
pub use status::CaseStatus;
