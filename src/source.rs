/// Reading input logs from disk.
use std::path::{Path, PathBuf};

/// Errors produced while reading a log file.
#[derive(Debug)]
pub enum SourceError {
    /// The file exists but could not be read (permissions, not UTF-8, a directory...).
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::Read { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SourceError::Read { source, .. } => Some(source),
        }
    }
}

/// Read a log file as lines.
///
/// Returns `Ok(None)` when the file does not exist; absence is not an error.
/// Lines break on `\n`, `\r\n` and a bare `\r` (progress bars), plus the
/// other Unicode line boundaries; a trailing break does not produce an extra
/// empty line.
pub fn read_log_lines(path: &Path) -> Result<Option<Vec<String>>, SourceError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(SourceError::Read {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    Ok(Some(split_lines(&contents)))
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

fn split_lines(contents: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = contents.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        lines.push(contents[start..i].to_string());
        start = i + c.len_utf8();
        // \r\n is a single break
        if c == '\r' {
            if let Some(&(j, '\n')) = chars.peek() {
                chars.next();
                start = j + 1;
            }
        }
    }

    if start < contents.len() {
        lines.push(contents[start..].to_string());
    }
    lines
}
