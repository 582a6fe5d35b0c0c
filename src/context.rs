use std::path::{Path, PathBuf};

use crate::paths;

/// Where permanent links point. Only exists when every part is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkContext {
    pub server_url: String,
    pub repository: String,
    pub sha: String,
}

/// Run environment, read once when the reporter is set up.
#[derive(Debug, Clone)]
pub struct ReportContext {
    /// Base for the relative paths shown in the report.
    pub root_dir: PathBuf,
    /// Base for the paths inside permanent links.
    pub checkout_root: PathBuf,
    /// Running inside a CI job that has a summary document.
    pub ci: bool,
    pub links: Option<LinkContext>,
}

impl ReportContext {
    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup(root_dir: &Path, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        let root_dir = paths::absolutize(&cwd, root_dir);
        let checkout_root = var("GITHUB_WORKSPACE")
            .map(|ws| paths::absolutize(&cwd, Path::new(&ws)))
            .unwrap_or_else(|| root_dir.clone());

        let links = match (
            var("GITHUB_SERVER_URL"),
            var("GITHUB_REPOSITORY"),
            var("GITHUB_SHA"),
        ) {
            (Some(server_url), Some(repository), Some(sha)) => Some(LinkContext {
                server_url,
                repository,
                sha,
            }),
            _ => None,
        };

        Self {
            root_dir,
            checkout_root,
            ci: var("GITHUB_ACTIONS").is_some(),
            links,
        }
    }

    /// Path shown to readers.
    pub fn display_path(&self, file: &Path) -> String {
        paths::relative_path(&self.root_dir, file)
    }

    /// Permanent URL for `file`, or None when link generation is off or the
    /// file is not part of the checkout.
    pub fn permalink(&self, file: &Path, line: Option<u32>) -> Option<String> {
        let links = self.links.as_ref()?;
        let rel = paths::relative_within(&self.checkout_root, file)?;
        Some(paths::permalink(
            &links.server_url,
            &links.repository,
            &links.sha,
            &rel,
            line,
        ))
    }

    pub fn without_links(mut self) -> Self {
        self.links = None;
        self
    }

    /// Treat the run as CI even if the environment says otherwise.
    pub fn forced(mut self) -> Self {
        self.ci = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const FULL: &[(&str, &str)] = &[
        ("GITHUB_ACTIONS", "true"),
        ("GITHUB_SERVER_URL", "https://github.com"),
        ("GITHUB_REPOSITORY", "acme/widgets"),
        ("GITHUB_SHA", "0123abcd"),
        ("GITHUB_WORKSPACE", "/work"),
    ];

    #[test]
    fn full_environment_enables_links() {
        let ctx = ReportContext::from_lookup(Path::new("/work/pkg"), lookup(FULL));
        assert!(ctx.ci);
        assert_eq!(ctx.display_path(Path::new("/work/pkg/a.test.ts")), "a.test.ts");
        assert_eq!(
            ctx.permalink(Path::new("/work/pkg/a.test.ts"), Some(7)).as_deref(),
            Some("https://github.com/acme/widgets/blob/0123abcd/pkg/a.test.ts#L7")
        );
    }

    #[test]
    fn no_permalink_outside_checkout() {
        let ctx = ReportContext::from_lookup(Path::new("/work"), lookup(FULL));
        assert_eq!(ctx.permalink(Path::new("/elsewhere/x.test.ts"), Some(3)), None);
        assert_eq!(ctx.display_path(Path::new("/elsewhere/x.test.ts")), "/elsewhere/x.test.ts");
    }

    #[test]
    fn missing_sha_disables_links_only() {
        let vars: Vec<_> = FULL.iter().copied().filter(|(k, _)| *k != "GITHUB_SHA").collect();
        let ctx = ReportContext::from_lookup(Path::new("/work"), lookup(&vars));
        assert!(ctx.ci);
        assert!(ctx.links.is_none());
        assert_eq!(ctx.permalink(Path::new("/work/a.test.ts"), None), None);
    }

    #[test]
    fn empty_values_count_as_unset() {
        let ctx = ReportContext::from_lookup(
            Path::new("/work"),
            lookup(&[("GITHUB_ACTIONS", ""), ("GITHUB_SERVER_URL", "https://github.com")]),
        );
        assert!(!ctx.ci);
        assert!(ctx.links.is_none());
    }

    #[test]
    fn checkout_root_defaults_to_root_dir() {
        let vars: Vec<_> = FULL
            .iter()
            .copied()
            .filter(|(k, _)| *k != "GITHUB_WORKSPACE")
            .collect();
        let ctx = ReportContext::from_lookup(Path::new("/work/pkg"), lookup(&vars));
        assert_eq!(ctx.checkout_root, PathBuf::from("/work/pkg"));
    }

    #[test]
    fn forced_and_linkless_overrides() {
        let ctx = ReportContext::from_lookup(Path::new("/work"), lookup(&[])).forced();
        assert!(ctx.ci);
        let ctx = ReportContext::from_lookup(Path::new("/work"), lookup(FULL)).without_links();
        assert!(ctx.links.is_none());
    }
}
