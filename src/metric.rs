/// METRIC line parsing: turn raw log lines into `job.key -> value` entries.
///
/// A metric line looks like:
/// `METRIC job=build key=duration value=42`
///
/// Lines that don't start with `METRIC ` (after trimming) are ignored, as are
/// tokens without an `=`. Missing `job`/`key` fields default to `unknown`,
/// a missing `value` defaults to the empty string. Parsing never fails.
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// Prefix that marks a line as a metric line. Case-sensitive, single space.
pub const METRIC_PREFIX: &str = "METRIC ";

/// Placeholder used when a line has no `job` or no `key` field.
const UNKNOWN: &str = "unknown";

/// Whitespace for trimming and field splitting. Includes the ASCII
/// separator controls `\x1c`-`\x1f`, which `char::is_whitespace` excludes.
fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}

/// Recognized fields of a single metric line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MetricFields {
    pub job: Option<String>,
    pub key: Option<String>,
    pub value: Option<String>,
}

impl MetricFields {
    /// Parse one line. Returns `None` if it isn't a metric line.
    ///
    /// When a field name repeats within a line, the last token wins.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_matches(is_separator);
        if !line.starts_with(METRIC_PREFIX) {
            return None;
        }

        let mut fields = MetricFields::default();
        // First token is the METRIC marker itself.
        let tokens = line.split(is_separator).filter(|t| !t.is_empty());
        for token in tokens.skip(1) {
            let Some((name, value)) = token.split_once('=') else {
                continue;
            };
            let slot = match name {
                "job" => &mut fields.job,
                "key" => &mut fields.key,
                "value" => &mut fields.value,
                _ => continue,
            };
            *slot = Some(value.to_string());
        }
        Some(fields)
    }

    /// The `"<job>.<key>"` composite key.
    pub fn composite_key(&self) -> String {
        format!(
            "{}.{}",
            self.job.as_deref().unwrap_or(UNKNOWN),
            self.key.as_deref().unwrap_or(UNKNOWN)
        )
    }

    /// Consume the fields, yielding `(composite_key, value)`.
    pub fn into_entry(self) -> (String, String) {
        let key = self.composite_key();
        (key, self.value.unwrap_or_default())
    }
}

/// String-keyed metric table that keeps keys in first-insertion order.
///
/// Re-inserting an existing key replaces its value but keeps its position.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MetricTable {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl MetricTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite. Returns the previous value, if any.
    pub fn insert(&mut self, key: String, value: String) -> Option<String> {
        match self.index.get(&key) {
            Some(&i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Merge `other` into `self`; values from `other` win on collision.
    ///
    /// Returns the keys that were overwritten.
    pub fn merge(&mut self, other: MetricTable) -> Vec<String> {
        let mut overwritten = Vec::new();
        for (key, value) in other.entries {
            if self.insert(key.clone(), value).is_some() {
                overwritten.push(key);
            }
        }
        overwritten
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index.get(key).map(|&i| self.entries[i].1.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Serialize for MetricTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Parse a sequence of lines (one file's contents) into a metric table.
///
/// Later lines overwrite earlier ones with the same composite key.
pub fn parse_metrics<I, S>(lines: I) -> MetricTable
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut table = MetricTable::new();
    for line in lines {
        if let Some(fields) = MetricFields::parse(line.as_ref()) {
            let (key, value) = fields.into_entry();
            table.insert(key, value);
        }
    }
    table
}
