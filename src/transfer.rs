//! CSV and JSON import/export of task lists.
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::{IconRef, Task, task::clamp_axis};

const CSV_HEADER: [&str; 4] = ["title", "urgency", "importance", "icon"];

/// Interchange formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Json,
}

impl Format {
    /// Pick the format from a file's extension.
    pub fn from_path(path: &Path) -> Result<Self, TransferError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(Format::Csv),
            "json" => Ok(Format::Json),
            _ => Err(TransferError::UnsupportedExtension(ext)),
        }
    }

    /// Name of the exported file.
    pub fn file_name(self) -> &'static str {
        match self {
            Format::Csv => "tasks.csv",
            Format::Json => "tasks.json",
        }
    }
}

/// Errors that can occur when importing or exporting tasks.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("unsupported file extension `{0}`")]
    UnsupportedExtension(String),
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a JSON array of tasks")]
    NotAnArray,
    #[error("CSV output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Loosely-typed row shared by both formats before coercion.
#[derive(Debug, Default)]
struct RawRow {
    title: Option<String>,
    urgency: Option<Value>,
    importance: Option<Value>,
    icon: Option<String>,
}

impl RawRow {
    /// Rows without a title are dropped.
    fn into_task(self) -> Option<Task> {
        let title = self.title.filter(|t| !t.is_empty())?;
        let icon = self
            .icon
            .filter(|i| !i.trim().is_empty())
            .map(|i| IconRef::parse(&i))
            .unwrap_or_default();
        Some(Task {
            title,
            urgency: coerce_number(self.urgency.as_ref()),
            importance: coerce_number(self.importance.as_ref()),
            icon,
        })
    }
}

/// Numbers pass through, numeric strings are parsed, anything else counts as zero.
/// The result is clamped into the axis range.
fn coerce_number(value: Option<&Value>) -> f64 {
    let raw = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        _ => 0.0,
    };
    clamp_axis(raw)
}

fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Parse a task list in the given format.
pub fn import(bytes: &[u8], format: Format) -> Result<Vec<Task>, TransferError> {
    let rows = match format {
        Format::Csv => read_csv(bytes)?,
        Format::Json => read_json(bytes)?,
    };
    Ok(rows.into_iter().filter_map(RawRow::into_task).collect())
}

/// Read and parse a file, choosing the format by extension.
pub fn import_file(path: &Path) -> Result<Vec<Task>, TransferError> {
    let format = Format::from_path(path)?;
    let bytes = std::fs::read(path)?;
    let tasks = import(&bytes, format)?;
    tracing::info!(path = %path.display(), count = tasks.len(), "imported tasks");
    Ok(tasks)
}

fn read_csv(bytes: &[u8]) -> Result<Vec<RawRow>, TransferError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(bytes);
    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let (title, urgency, importance, icon) = (
        column("title"),
        column("urgency"),
        column("importance"),
        column("icon"),
    );

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let field = |idx: Option<usize>| idx.and_then(|i| record.get(i)).map(str::to_string);
        rows.push(RawRow {
            title: field(title),
            urgency: field(urgency).map(Value::String),
            importance: field(importance).map(Value::String),
            icon: field(icon),
        });
    }
    Ok(rows)
}

fn read_json(bytes: &[u8]) -> Result<Vec<RawRow>, TransferError> {
    let Value::Array(items) = serde_json::from_slice::<Value>(bytes)? else {
        return Err(TransferError::NotAnArray);
    };
    Ok(items
        .into_iter()
        .map(|item| match item {
            Value::Object(mut obj) => RawRow {
                title: obj.remove("title").and_then(value_to_string),
                urgency: obj.remove("urgency"),
                importance: obj.remove("importance"),
                icon: obj.remove("icon").and_then(value_to_string),
            },
            _ => RawRow::default(),
        })
        .collect())
}

#[derive(Serialize)]
struct CsvRow<'a> {
    title: &'a str,
    urgency: f64,
    importance: f64,
    icon: String,
}

/// Serialize a task list in the given format.
pub fn export(tasks: &[Task], format: Format) -> Result<String, TransferError> {
    match format {
        Format::Json => Ok(serde_json::to_string_pretty(tasks)?),
        Format::Csv => {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(Vec::new());
            writer.write_record(CSV_HEADER)?;
            for task in tasks {
                writer.serialize(CsvRow {
                    title: &task.title,
                    urgency: task.urgency,
                    importance: task.importance,
                    icon: task.icon.to_string(),
                })?;
            }
            let bytes = writer.into_inner().map_err(|e| e.into_error())?;
            Ok(String::from_utf8(bytes)?)
        }
    }
}

/// Export into `dir`, using the format's file name. Returns the written path.
pub fn export_to_dir(
    tasks: &[Task],
    format: Format,
    dir: &Path,
) -> Result<std::path::PathBuf, TransferError> {
    let body = export(tasks, format)?;
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format.file_name());
    std::fs::write(&path, body)?;
    tracing::info!(path = %path.display(), count = tasks.len(), "exported tasks");
    Ok(path)
}
