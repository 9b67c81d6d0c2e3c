/// Run aggregation: read each configured log in order and merge its metrics.
use crate::metric::{parse_metrics, MetricTable};
use crate::source::{read_log_lines, SourceError};
use std::path::PathBuf;

/// Errors produced while aggregating a run.
#[derive(Debug)]
pub enum AnalyzeError {
    Source(SourceError),
}

impl std::fmt::Display for AnalyzeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalyzeError::Source(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for AnalyzeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalyzeError::Source(e) => Some(e),
        }
    }
}

impl From<SourceError> for AnalyzeError {
    fn from(e: SourceError) -> Self {
        AnalyzeError::Source(e)
    }
}

/// Merges the metrics of an ordered list of log files found in one directory.
pub struct RunAggregator {
    dir: PathBuf,
    files: Vec<String>,
}

impl RunAggregator {
    /// `files` are resolved against `dir` and merged in the given order.
    pub fn new(dir: PathBuf, files: Vec<String>) -> Self {
        Self { dir, files }
    }

    /// Read, parse and merge every file. Missing files are skipped.
    ///
    /// The first read error aborts the run.
    pub fn aggregate(&self) -> Result<MetricTable, AnalyzeError> {
        let mut metrics = MetricTable::new();

        for name in &self.files {
            let path = self.dir.join(name);
            let Some(lines) = read_log_lines(&path)? else {
                tracing::debug!(path = %path.display(), "log file not present, skipping");
                continue;
            };

            let parsed = parse_metrics(&lines);
            tracing::debug!(
                path = %path.display(),
                lines = lines.len(),
                metrics = parsed.len(),
                "parsed log file"
            );

            for key in metrics.merge(parsed) {
                tracing::debug!(key = %key, file = %name, "metric overwritten by later file");
            }
        }

        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_LOG_FILES;
    use tempfile::tempdir;

    fn default_files() -> Vec<String> {
        DEFAULT_LOG_FILES.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_files_present_is_empty() {
        let dir = tempdir().unwrap();
        let agg = RunAggregator::new(dir.path().to_path_buf(), default_files());
        assert!(agg.aggregate().unwrap().is_empty());
    }

    #[test]
    fn test_later_file_wins() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("build.log"), "METRIC job=x key=y value=1\n").unwrap();
        std::fs::write(dir.path().join("test.log"), "METRIC job=x key=y value=2\n").unwrap();

        let agg = RunAggregator::new(dir.path().to_path_buf(), default_files());
        let metrics = agg.aggregate().unwrap();
        assert_eq!(metrics.get("x.y"), Some("2"));
        assert_eq!(metrics.len(), 1);
    }

    #[test]
    fn test_fixed_order_not_directory_order() {
        let dir = tempdir().unwrap();
        // Written in reverse; policy.log must still be merged last.
        std::fs::write(
            dir.path().join("policy.log"),
            "METRIC job=p key=k value=policy\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("release.log"),
            "METRIC job=p key=k value=release\nMETRIC job=r key=v value=1.0\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("build.log"), "METRIC job=b key=ok value=yes\n").unwrap();

        let agg = RunAggregator::new(dir.path().to_path_buf(), default_files());
        let metrics = agg.aggregate().unwrap();
        let entries: Vec<_> = metrics.iter().collect();
        assert_eq!(
            entries,
            vec![("b.ok", "yes"), ("p.k", "policy"), ("r.v", "1.0")]
        );
    }

    #[test]
    fn test_progress_bar_carriage_return_splits_lines() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("build.log"),
            "Compiling 50%\rMETRIC job=build key=duration value=42\n",
        )
        .unwrap();

        let agg = RunAggregator::new(dir.path().to_path_buf(), default_files());
        assert_eq!(agg.aggregate().unwrap().get("build.duration"), Some("42"));
    }

    #[test]
    fn test_unlisted_files_are_ignored() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("deploy.log"), "METRIC job=d key=k value=1\n").unwrap();
        let agg = RunAggregator::new(dir.path().to_path_buf(), default_files());
        assert!(agg.aggregate().unwrap().is_empty());
    }

    #[test]
    fn test_custom_file_list() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.log"), "METRIC job=a key=k value=1\n").unwrap();
        std::fs::write(dir.path().join("b.log"), "METRIC job=a key=k value=2\n").unwrap();

        let agg = RunAggregator::new(
            dir.path().to_path_buf(),
            vec!["b.log".to_string(), "a.log".to_string()],
        );
        assert_eq!(agg.aggregate().unwrap().get("a.k"), Some("1"));
    }

    #[test]
    fn test_read_error_propagates() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("test.log")).unwrap();
        let agg = RunAggregator::new(dir.path().to_path_buf(), default_files());
        let err = agg.aggregate().unwrap_err();
        assert!(matches!(err, AnalyzeError::Source(_)));
        assert!(err.to_string().contains("test.log"));
    }
}
