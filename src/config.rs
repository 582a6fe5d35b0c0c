use std::path::Path;

use serde::Deserialize;

pub const CONFIG_FILE: &str = "test-summary.toml";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub links: LinksConfig,
}

/// Controls the headings and failure blocks of the rendered report.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Top-level heading.
    pub title: String,
    /// Joins file path, group titles and case title in failure labels.
    /// Example: " > "
    pub separator: String,
    /// Render at most this many failure blocks; the rest are counted.
    pub max_failures: Option<usize>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "Test Results".into(),
            separator: " ▸ ".into(),
            max_failures: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    /// Set to false to show plain paths even when the CI context is complete.
    pub enabled: bool,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    /// Load `test-summary.toml` from the project root, falling back to defaults if absent or invalid.
    pub fn load(root: &Path) -> Self {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Self::default();
        }
        Self::load_from(&path)
    }

    /// Load an explicitly requested file. Unreadable or invalid files are
    /// reported and replaced by defaults.
    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %path.display(), "cannot read config, using defaults: {e}");
                return Self::default();
            }
        };
        toml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), "ignoring invalid config: {e}");
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path());
        assert_eq!(config.report.title, "Test Results");
        assert_eq!(config.report.separator, " ▸ ");
        assert!(config.links.enabled);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[report]\nseparator = \" > \"\nmax_failures = 3\n",
        )
        .unwrap();
        let config = Config::load(dir.path());
        assert_eq!(config.report.title, "Test Results");
        assert_eq!(config.report.separator, " > ");
        assert_eq!(config.report.max_failures, Some(3));
        assert!(config.links.enabled);
    }

    /// Run `f` with a subscriber that collects formatted log lines.
    fn capture_logs(f: impl FnOnce()) -> String {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let writer = SharedBuf(Arc::clone(&buf));
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = buf.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[derive(Clone)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for SharedBuf {
        fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn explicit_missing_file_warns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nowhere.toml");
        let mut config = None;
        let logs = capture_logs(|| config = Some(Config::load_from(&path)));

        assert_eq!(config.unwrap().report.title, "Test Results");
        assert!(logs.contains("WARN"));
        assert!(logs.contains("cannot read config"));
    }

    #[test]
    fn implicit_missing_file_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let logs = capture_logs(|| {
            Config::load(dir.path());
        });
        assert!(logs.is_empty());
    }

    #[test]
    fn invalid_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[links]\nenabled = \"nope\"\n").unwrap();
        let config = Config::load(dir.path());
        assert!(config.links.enabled);
    }
}
