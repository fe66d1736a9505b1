use serde::Serialize;
use std::path::{Path, PathBuf};

/// One record of a CSV document, as read from disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsvRow {
    /// 1-based record number in the source file, header included.
    pub record: usize,
    pub fields: Vec<String>,
}

impl CsvRow {
    pub fn new(record: usize, fields: Vec<String>) -> Self {
        CsvRow { record, fields }
    }

    pub fn field(&self, idx: usize) -> Option<&str> {
        self.fields.get(idx).map(String::as_str)
    }
}

/// Per-item data discovered while enumerating the inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemPayload {
    /// The item is the file itself.
    File,
    /// The item is one row of the file.
    Row(CsvRow),
}

/// A single unit of work for the batch runner. Immutable once enumerated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputItem {
    pub path: PathBuf,
    pub payload: ItemPayload,
}

impl InputItem {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        InputItem {
            path: path.into(),
            payload: ItemPayload::File,
        }
    }

    pub fn row(path: impl Into<PathBuf>, row: CsvRow) -> Self {
        InputItem {
            path: path.into(),
            payload: ItemPayload::Row(row),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn as_row(&self) -> Option<&CsvRow> {
        match &self.payload {
            ItemPayload::Row(row) => Some(row),
            ItemPayload::File => None,
        }
    }

    /// Short human-readable label used in progress messages.
    pub fn label(&self) -> String {
        match &self.payload {
            ItemPayload::File => self.file_name(),
            ItemPayload::Row(row) => format!("{} row {}", self.file_name(), row.record),
        }
    }
}
