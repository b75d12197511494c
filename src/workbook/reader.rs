//! Container readers
//!
//! A reader opens a container read-only, extracts every cell, and drops the
//! file handle before returning. Binary spreadsheet formats are supplied by
//! the host through `WorkbookReader`; this crate ships the JSON rendition.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::cell::{CachedResult, Cell, Row, Sheet, Workbook};
use super::errors::{WorkbookError, WorkbookResult};

/// Turns a container file into an in-memory `Workbook`.
pub trait WorkbookReader {
    /// File extensions (without the dot, lowercase) this reader understands.
    fn extensions(&self) -> &[&'static str];

    /// Opens the container at `path` and extracts all sheets.
    fn open(&self, path: &Path) -> WorkbookResult<Workbook>;
}

/// Reads workbooks stored as JSON:
///
/// ```json
/// {"sheets": [{"name": "Items", "rows": [["id", "name"], ["int", "string"], [1, "sword"], null]}]}
/// ```
///
/// `null` cells are blank, `null` rows are absent, `{"formula": "..", "cached": ..}`
/// is a formula cell and `{"error": ".."}` is a cell of unknown kind.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonWorkbookReader;

impl JsonWorkbookReader {
    pub fn new() -> Self {
        Self
    }

    /// Decodes a workbook from JSON text. `origin` is used in error messages.
    pub fn parse_str(&self, origin: &Path, content: &str) -> WorkbookResult<Workbook> {
        let raw: RawWorkbook =
            serde_json::from_str(content).map_err(|e| WorkbookError::Malformed {
                path: origin.to_path_buf(),
                reason: format!("Invalid JSON: {}", e),
            })?;

        Ok(raw.into_workbook())
    }
}

impl WorkbookReader for JsonWorkbookReader {
    fn extensions(&self) -> &[&'static str] {
        &["json"]
    }

    fn open(&self, path: &Path) -> WorkbookResult<Workbook> {
        let content = fs::read_to_string(path).map_err(|e| WorkbookError::Open {
            path: path.to_path_buf(),
            source: e,
        })?;

        self.parse_str(path, &content)
    }
}

#[derive(Deserialize)]
struct RawWorkbook {
    sheets: Vec<RawSheet>,
}

#[derive(Deserialize)]
struct RawSheet {
    name: String,
    #[serde(default)]
    rows: Vec<Option<Vec<RawCell>>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCell {
    Blank,
    Boolean(bool),
    Numeric(f64),
    String(String),
    Formula {
        formula: String,
        #[serde(default)]
        cached: Option<RawCached>,
    },
    Error {
        #[allow(dead_code)]
        error: String,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCached {
    Boolean(bool),
    Numeric(f64),
    String(String),
    Error {
        #[allow(dead_code)]
        error: String,
    },
}

impl RawWorkbook {
    fn into_workbook(self) -> Workbook {
        let sheets = self
            .sheets
            .into_iter()
            .map(|sheet| {
                let rows = sheet
                    .rows
                    .into_iter()
                    .map(|row| row.map(|cells| Row::new(cells.into_iter().map(Cell::from).collect())))
                    .collect();
                Sheet::new(sheet.name, rows)
            })
            .collect();

        Workbook::new(sheets)
    }
}

impl From<RawCell> for Cell {
    fn from(raw: RawCell) -> Self {
        match raw {
            RawCell::Blank => Cell::Blank,
            RawCell::Boolean(b) => Cell::Boolean(b),
            RawCell::Numeric(n) => Cell::Numeric(n),
            RawCell::String(s) => Cell::String(s),
            RawCell::Formula { formula, cached } => Cell::Formula {
                text: formula,
                cached: cached.map(|c| match c {
                    RawCached::Boolean(b) => CachedResult::Boolean(b),
                    RawCached::Numeric(n) => CachedResult::Numeric(n),
                    RawCached::String(s) => CachedResult::String(s),
                    RawCached::Error { .. } => CachedResult::Error,
                }),
            },
            RawCell::Error { .. } => Cell::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const SAMPLE: &str = r##"{
        "sheets": [
            {"name": "Items", "rows": [
                ["id", "name", null],
                ["int", "string"],
                [1, "sword", true],
                null,
                [{"formula": "A3*2", "cached": 2}, {"error": "#REF!"}]
            ]}
        ]
    }"##;

    #[test]
    fn test_parse_cells() {
        let reader = JsonWorkbookReader::new();
        let book = reader.parse_str(&PathBuf::from("items.json"), SAMPLE).unwrap();

        assert_eq!(book.sheet_count(), 1);
        let sheet = &book.sheets()[0];
        assert_eq!(sheet.name(), "Items");
        assert_eq!(sheet.row(0).unwrap().cell(2), Some(&Cell::Blank));
        assert_eq!(sheet.row(2).unwrap().cell(0), Some(&Cell::Numeric(1.0)));
        assert_eq!(sheet.row(2).unwrap().cell(2), Some(&Cell::Boolean(true)));
        assert!(sheet.row(3).is_none());

        let last = sheet.row(4).unwrap();
        assert_eq!(
            last.cell(0),
            Some(&Cell::formula("A3*2", Some(CachedResult::Numeric(2.0))))
        );
        assert_eq!(last.cell(1), Some(&Cell::Unknown));
    }

    #[test]
    fn test_malformed_json() {
        let reader = JsonWorkbookReader::new();
        let result = reader.parse_str(&PathBuf::from("bad.json"), "{\"sheets\": 3}");
        assert!(matches!(result, Err(WorkbookError::Malformed { .. })));
    }

    #[test]
    fn test_open_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let reader = JsonWorkbookReader::new();
        let result = reader.open(&temp_dir.path().join("absent.json"));
        assert!(matches!(result, Err(WorkbookError::Open { .. })));
    }

    #[test]
    fn test_open_from_disk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("items.json");
        std::fs::write(&path, SAMPLE).unwrap();

        let book = JsonWorkbookReader::new().open(&path).unwrap();
        assert_eq!(book.first_sheet().unwrap().row_count(), 5);
    }
}
