pub mod jest;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::models::TestRunResult;

use jest::JestAggregate;

/// Expand the given paths and glob patterns (relative ones against `base`).
/// Each pattern must match at least one file; matches are taken in sorted order.
pub fn resolve(patterns: &[String], base: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let full = if Path::new(pattern).is_absolute() {
            PathBuf::from(pattern)
        } else {
            base.join(pattern)
        };

        if !is_glob(pattern) {
            files.push(full);
            continue;
        }

        let mut matches: Vec<PathBuf> = glob::glob(&full.to_string_lossy())
            .with_context(|| format!("invalid glob pattern '{}'", pattern))?
            .flatten()
            .filter(|p| p.is_file())
            .collect();
        matches.sort();

        if matches.is_empty() {
            anyhow::bail!("no result files match '{}'", pattern);
        }
        for m in matches {
            if !files.contains(&m) {
                files.push(m);
            }
        }
    }
    Ok(files)
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Read one Jest JSON result file.
pub async fn load_file(path: &Path) -> Result<TestRunResult> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let aggregate: JestAggregate = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse Jest results in {}", path.display()))?;

    let reported = aggregate.reported_counts();
    let run = aggregate.into_run_result();
    if let Some(reported) = reported
        && reported != run.counts()
    {
        tracing::warn!(
            path = %path.display(),
            ?reported,
            derived = ?run.counts(),
            "reported totals disagree with case statuses; using case statuses"
        );
    }
    Ok(run)
}

/// Load and merge result shards in the order given.
pub async fn load(patterns: &[String], base: &Path) -> Result<TestRunResult> {
    let mut run = TestRunResult::default();
    for path in resolve(patterns, base)? {
        tracing::debug!(path = %path.display(), "loading results");
        run.merge(load_file(&path).await?);
    }
    Ok(run)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shard(file: &str, status: &str) -> String {
        format!(
            r#"{{"testResults": [{{"name": "{}", "assertionResults": [
                {{"ancestorTitles": [], "title": "t", "status": "{}", "failureMessages": []}}
            ]}}]}}"#,
            file, status
        )
    }

    #[tokio::test]
    async fn merges_glob_matches_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("shard-2.json"), shard("/repo/b.test.ts", "failed")).unwrap();
        std::fs::write(dir.path().join("shard-1.json"), shard("/repo/a.test.ts", "passed")).unwrap();

        let run = load(&["shard-*.json".to_string()], dir.path()).await.unwrap();
        let paths: Vec<_> = run.files.iter().map(|f| f.path.clone()).collect();
        assert_eq!(
            paths,
            vec![PathBuf::from("/repo/a.test.ts"), PathBuf::from("/repo/b.test.ts")]
        );
        assert_eq!(run.num_failed(), 1);
    }

    #[tokio::test]
    async fn literal_paths_keep_given_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("z.json"), shard("/repo/z.test.ts", "passed")).unwrap();
        std::fs::write(dir.path().join("a.json"), shard("/repo/a.test.ts", "passed")).unwrap();

        let run = load(&["z.json".to_string(), "a.json".to_string()], dir.path())
            .await
            .unwrap();
        assert_eq!(run.files[0].path, PathBuf::from("/repo/z.test.ts"));
    }

    #[tokio::test]
    async fn unmatched_glob_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&["*.json".to_string()], dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("no result files"));
    }

    #[tokio::test]
    async fn malformed_json_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), "{not json").unwrap();
        let err = load(&["bad.json".to_string()], dir.path()).await.unwrap_err();
        assert!(format!("{:#}", err).contains("bad.json"));
    }
}
