//! Workload loading.
//!
//! Two formats are accepted:
//!
//! - **Text**: one process per line, `name;arrival;burst;ioInterval;ioDuration`.
//!   The two I/O fields are optional and default to 0 (no I/O). Blank lines
//!   and lines starting with `#` are skipped; whitespace around fields is
//!   ignored.
//! - **JSON**: an array of objects with `name`, `arrival`, `cpu_burst`, and
//!   optional `io_interval` / `io_duration`.
//!
//! Loaders only check syntax and signs. Semantic checks (zero burst,
//! duplicate names) belong to [`Scenario::validate`](crate::Scenario::validate).

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::task::ProcessDef;
use crate::types::Tick;

/// What went wrong while loading a workload.
#[derive(Debug)]
pub enum WorkloadErrorKind {
    /// A required field is absent or empty.
    MissingField(&'static str),
    /// A numeric field does not parse.
    InvalidNumber { field: &'static str, value: String },
    /// A numeric field is negative.
    NegativeValue { field: &'static str, value: i64 },
    /// JSON parse error.
    Json(serde_json::Error),
    /// The workload file could not be read.
    Io(std::io::Error),
}

/// Errors from loading a workload.
#[derive(Debug)]
pub struct WorkloadError {
    /// 1-based line number, when the error is tied to a line.
    pub line: Option<usize>,
    pub kind: WorkloadErrorKind,
}

impl WorkloadError {
    fn at(line: usize, kind: WorkloadErrorKind) -> Self {
        WorkloadError {
            line: Some(line),
            kind,
        }
    }
}

impl fmt::Display for WorkloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(line) = self.line {
            write!(f, "line {line}: ")?;
        }
        match &self.kind {
            WorkloadErrorKind::MissingField(field) => write!(f, "missing required field: {field}"),
            WorkloadErrorKind::InvalidNumber { field, value } => {
                write!(f, "{field}: expected non-negative integer, got {value:?}")
            }
            WorkloadErrorKind::NegativeValue { field, value } => {
                write!(f, "{field}: must be non-negative, got {value}")
            }
            WorkloadErrorKind::Json(e) => write!(f, "JSON parse error: {e}"),
            WorkloadErrorKind::Io(e) => write!(f, "read error: {e}"),
        }
    }
}

impl std::error::Error for WorkloadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            WorkloadErrorKind::Json(e) => Some(e),
            WorkloadErrorKind::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for WorkloadError {
    fn from(e: serde_json::Error) -> Self {
        WorkloadError {
            line: Some(e.line()).filter(|&l| l > 0),
            kind: WorkloadErrorKind::Json(e),
        }
    }
}

impl From<std::io::Error> for WorkloadError {
    fn from(e: std::io::Error) -> Self {
        WorkloadError {
            line: None,
            kind: WorkloadErrorKind::Io(e),
        }
    }
}

/// Something that can produce an ordered list of process definitions.
pub trait WorkloadLoader {
    fn load(&self) -> Result<Vec<ProcessDef>, WorkloadError>;
}

impl WorkloadLoader for [ProcessDef] {
    fn load(&self) -> Result<Vec<ProcessDef>, WorkloadError> {
        Ok(self.to_vec())
    }
}

/// On-disk workload encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkloadFormat {
    Text,
    Json,
}

impl WorkloadFormat {
    /// `.json` files are JSON; everything else is the text format.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => WorkloadFormat::Json,
            _ => WorkloadFormat::Text,
        }
    }
}

/// Loads a workload from a file.
#[derive(Debug, Clone)]
pub struct FileLoader {
    pub path: PathBuf,
    pub format: WorkloadFormat,
}

impl FileLoader {
    /// Loader with the format inferred from the file extension.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = WorkloadFormat::from_path(&path);
        FileLoader { path, format }
    }
}

impl WorkloadLoader for FileLoader {
    fn load(&self) -> Result<Vec<ProcessDef>, WorkloadError> {
        let contents = std::fs::read_to_string(&self.path)?;
        debug!(path = %self.path.display(), format = ?self.format, "loading workload");
        match self.format {
            WorkloadFormat::Text => parse_text(&contents),
            WorkloadFormat::Json => parse_json(&contents),
        }
    }
}

fn parse_field(line: usize, field: &'static str, raw: Option<&str>) -> Result<Tick, WorkloadError> {
    let raw = match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return Err(WorkloadError::at(line, WorkloadErrorKind::MissingField(field))),
    };
    parse_number(line, field, raw)
}

fn parse_optional(line: usize, field: &'static str, raw: Option<&str>) -> Result<Tick, WorkloadError> {
    match raw.map(str::trim) {
        Some(s) if !s.is_empty() => parse_number(line, field, s),
        _ => Ok(0),
    }
}

fn parse_number(line: usize, field: &'static str, raw: &str) -> Result<Tick, WorkloadError> {
    if let Ok(v) = raw.parse::<Tick>() {
        return Ok(v);
    }
    match raw.parse::<i64>() {
        Ok(v) if v < 0 => Err(WorkloadError::at(
            line,
            WorkloadErrorKind::NegativeValue { field, value: v },
        )),
        _ => Err(WorkloadError::at(
            line,
            WorkloadErrorKind::InvalidNumber {
                field,
                value: raw.to_string(),
            },
        )),
    }
}

/// Parse the semicolon-separated text format.
pub fn parse_text(src: &str) -> Result<Vec<ProcessDef>, WorkloadError> {
    let mut defs = Vec::new();
    for (idx, raw_line) in src.lines().enumerate() {
        let line = idx + 1;
        let text = raw_line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let mut fields = text.split(';');
        let name = fields.next().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            return Err(WorkloadError::at(line, WorkloadErrorKind::MissingField("name")));
        }
        let arrival = parse_field(line, "arrival", fields.next())?;
        let cpu_burst = parse_field(line, "burst", fields.next())?;
        let io_interval = parse_optional(line, "ioInterval", fields.next())?;
        let io_duration = parse_optional(line, "ioDuration", fields.next())?;

        defs.push(ProcessDef::new(name, arrival, cpu_burst).with_io(io_interval, io_duration));
    }
    Ok(defs)
}

/// Parse the JSON array format.
pub fn parse_json(src: &str) -> Result<Vec<ProcessDef>, WorkloadError> {
    Ok(serde_json::from_str(src)?)
}
