//! Cell, row, sheet, and workbook structures

use std::fmt;

/// The kind of a raw cell, used in error messages and scan decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Blank,
    String,
    Boolean,
    Numeric,
    Formula,
    Unknown,
}

impl CellKind {
    /// Returns the lowercase kind name
    pub fn as_str(&self) -> &'static str {
        match self {
            CellKind::Blank => "blank",
            CellKind::String => "string",
            CellKind::Boolean => "boolean",
            CellKind::Numeric => "numeric",
            CellKind::Formula => "formula",
            CellKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Last evaluated result of a formula cell, as stored by the container
#[derive(Debug, Clone, PartialEq)]
pub enum CachedResult {
    String(String),
    Boolean(bool),
    Numeric(f64),
    /// The formula evaluated to an error value
    Error,
}

/// A single untyped cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Blank,
    String(String),
    Boolean(bool),
    Numeric(f64),
    Formula {
        /// Formula source text, without the leading `=`
        text: String,
        /// Result of the last evaluation, if the container kept one
        cached: Option<CachedResult>,
    },
    Unknown,
}

impl Cell {
    /// Creates a formula cell with an optional cached result
    pub fn formula(text: impl Into<String>, cached: Option<CachedResult>) -> Self {
        Cell::Formula {
            text: text.into(),
            cached,
        }
    }

    /// Returns the cell kind
    pub fn kind(&self) -> CellKind {
        match self {
            Cell::Blank => CellKind::Blank,
            Cell::String(_) => CellKind::String,
            Cell::Boolean(_) => CellKind::Boolean,
            Cell::Numeric(_) => CellKind::Numeric,
            Cell::Formula { .. } => CellKind::Formula,
            Cell::Unknown => CellKind::Unknown,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Cell::Blank)
    }

    /// Returns the string payload of a string cell
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::String(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::String(s)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Boolean(b)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Numeric(n)
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Numeric(n as f64)
    }
}

/// A sparse row; cells past the end are absent
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    cells: Vec<Cell>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// Returns the cell at `col`, or `None` when absent
    pub fn cell(&self, col: usize) -> Option<&Cell> {
        self.cells.get(col)
    }

    /// Number of cells physically present in the row
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<C: Into<Cell>> FromIterator<C> for Row {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        Row::new(iter.into_iter().map(Into::into).collect())
    }
}

/// A named sheet; any row may be absent
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    name: String,
    rows: Vec<Option<Row>>,
}

impl Sheet {
    /// Creates a sheet from possibly-absent rows
    pub fn new(name: impl Into<String>, rows: Vec<Option<Row>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Creates a sheet where every row is present
    pub fn from_rows(name: impl Into<String>, rows: Vec<Row>) -> Self {
        Self::new(name, rows.into_iter().map(Some).collect())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the row at `index`, or `None` when absent
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index).and_then(|r| r.as_ref())
    }

    /// Number of row slots, including absent ones
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// An ordered collection of sheets
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Returns the first sheet, used for cheap change detection
    pub fn first_sheet(&self) -> Option<&Sheet> {
        self.sheets.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_kinds() {
        assert_eq!(Cell::Blank.kind(), CellKind::Blank);
        assert_eq!(Cell::from("x").kind(), CellKind::String);
        assert_eq!(Cell::from(true).kind(), CellKind::Boolean);
        assert_eq!(Cell::from(1.5).kind(), CellKind::Numeric);
        assert_eq!(Cell::formula("A1+1", None).kind(), CellKind::Formula);
        assert_eq!(Cell::Unknown.kind(), CellKind::Unknown);
    }

    #[test]
    fn test_row_absent_cells() {
        let row: Row = vec!["id", "name"].into_iter().collect();
        assert_eq!(row.cell(1).and_then(Cell::as_str), Some("name"));
        assert!(row.cell(2).is_none());
    }

    #[test]
    fn test_sheet_absent_rows() {
        let sheet = Sheet::new("Data", vec![Some(Row::default()), None]);
        assert!(sheet.row(0).is_some());
        assert!(sheet.row(1).is_none());
        assert!(sheet.row(7).is_none());
        assert_eq!(sheet.row_count(), 2);
    }
}
