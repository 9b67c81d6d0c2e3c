use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Log files read by default, in merge order.
pub const DEFAULT_LOG_FILES: [&str; 4] = ["build.log", "test.log", "release.log", "policy.log"];

/// Top-level configuration, optionally loaded from a TOML file.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub inputs: InputsConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct InputsConfig {
    /// File names, relative to the log directory. Later files win on key collisions.
    pub files: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Composite key the test-suite suggestion looks at.
    pub tests_total_key: String,
}

// --- Default implementations ---

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            files: DEFAULT_LOG_FILES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            tests_total_key: "test_agent.tests_total".to_string(),
        }
    }
}

impl AnalyzerConfig {
    /// Load configuration from a TOML file. The file must exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load from `path` if given, otherwise use defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}

/// Errors from loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            ConfigError::Parse { path, source } => {
                write!(f, "failed to parse config {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}
