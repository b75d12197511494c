//! Sheet schema parser
//!
//! Two-row protocol:
//! - row 0: column names, scanned left to right until the first blank or absent cell
//! - row 1: type cells, one per header column
//!
//! Each sheet is parsed against a `CanonicalSchema` shared by all sheets of a
//! source. The first sheet to provide names (and types) fixes them; every
//! later sheet must match position by position.

use std::collections::HashSet;

use crate::workbook::{Cell, Row, Sheet};

use super::errors::{CellLocation, SchemaError, SchemaResult};
use super::registry::{parse_type_cell, TypeCellError};
use super::types::{ColumnSchema, ColumnType, TableSchema};

const HEADER_ROW: usize = 0;
const TYPE_ROW: usize = 1;

/// Field names and types fixed by the first sheet that provided them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalSchema {
    field_names: Option<Vec<String>>,
    field_types: Option<Vec<ColumnType>>,
}

impl CanonicalSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field_names(&self) -> Option<&[String]> {
        self.field_names.as_deref()
    }

    pub fn field_types(&self) -> Option<&[ColumnType]> {
        self.field_types.as_deref()
    }

    /// Whether both names and types are fixed
    pub fn is_complete(&self) -> bool {
        self.field_names.is_some() && self.field_types.is_some()
    }

    /// Builds the table schema once both halves are fixed
    pub fn to_table_schema(&self, entity_name: &str) -> Option<TableSchema> {
        let names = self.field_names.as_ref()?;
        let types = self.field_types.as_ref()?;
        let columns = names
            .iter()
            .zip(types)
            .map(|(name, ty)| ColumnSchema::new(name.clone(), ty.clone()))
            .collect();
        Some(TableSchema::new(entity_name, columns))
    }
}

/// Result of parsing one sheet
#[derive(Debug, Clone, PartialEq)]
pub enum SheetSchema {
    /// The sheet declares these columns
    Columns(Vec<ColumnSchema>),
    /// The sheet has no header; it neither contributes nor conflicts
    Empty,
}

/// Parses the schema rows of a single sheet.
pub struct SheetParser<'a> {
    source_name: &'a str,
    sheet: &'a Sheet,
    canonical: &'a mut CanonicalSchema,
}

impl<'a> SheetParser<'a> {
    pub fn new(source_name: &'a str, sheet: &'a Sheet, canonical: &'a mut CanonicalSchema) -> Self {
        Self {
            source_name,
            sheet,
            canonical,
        }
    }

    /// Parses the header row and the type row.
    ///
    /// The first error aborts this sheet only; the canonical schema keeps
    /// whatever was fixed before the error.
    pub fn parse(&mut self) -> SchemaResult<SheetSchema> {
        let sheet = self.sheet;
        let field_names = match sheet.row(HEADER_ROW) {
            Some(row) => self.parse_header(row)?,
            None => return Ok(SheetSchema::Empty),
        };
        if field_names.is_empty() {
            return Ok(SheetSchema::Empty);
        }

        let columns = self.parse_type_row(sheet.row(TYPE_ROW), &field_names)?;
        Ok(SheetSchema::Columns(columns))
    }

    /// Parses the header row into normalized field names.
    ///
    /// A blank cell ends the column extent. The names become canonical if
    /// none are fixed yet, otherwise they must equal the canonical names.
    pub fn parse_header(&mut self, row: &Row) -> SchemaResult<Vec<String>> {
        let mut field_names = Vec::new();
        let mut seen = HashSet::new();

        for col in 0..row.len() {
            let location = CellLocation::new(HEADER_ROW, col);
            let name = match row.cell(col) {
                None | Some(Cell::Blank) => break,
                Some(Cell::String(raw)) => raw.trim().to_lowercase(),
                Some(other) => {
                    return Err(SchemaError::unknown_header_cell(
                        self.source_name,
                        self.sheet.name(),
                        location,
                        other.kind(),
                    ))
                }
            };
            if !seen.insert(name.clone()) {
                return Err(SchemaError::duplicate_field(
                    self.source_name,
                    self.sheet.name(),
                    location,
                    &name,
                ));
            }
            field_names.push(name);
        }

        if field_names.is_empty() {
            return Ok(field_names);
        }

        match self.canonical.field_names() {
            None => self.canonical.field_names = Some(field_names.clone()),
            Some(expected) if expected != field_names.as_slice() => {
                return Err(SchemaError::header_mismatch(
                    self.source_name,
                    self.sheet.name(),
                    expected,
                    &field_names,
                ))
            }
            Some(_) => {}
        }

        Ok(field_names)
    }

    /// Parses the type row across the extent of `field_names`.
    pub fn parse_type_row(
        &mut self,
        row: Option<&Row>,
        field_names: &[String],
    ) -> SchemaResult<Vec<ColumnSchema>> {
        let row = row.ok_or_else(|| {
            SchemaError::missing_type_definition(self.source_name, self.sheet.name(), None)
        })?;

        let mut columns = Vec::with_capacity(field_names.len());
        for (col, name) in field_names.iter().enumerate() {
            let location = CellLocation::new(TYPE_ROW, col);
            let column_type = match row.cell(col) {
                None | Some(Cell::Blank) => {
                    return Err(SchemaError::missing_type_definition(
                        self.source_name,
                        self.sheet.name(),
                        Some(location),
                    ))
                }
                Some(Cell::String(raw)) => self.parse_type_cell(raw, location)?,
                Some(other) => {
                    return Err(SchemaError::unsupported_type(
                        self.source_name,
                        self.sheet.name(),
                        location,
                        &format!("<{} cell>", other.kind()),
                    ))
                }
            };
            columns.push(ColumnSchema::new(name.clone(), column_type));
        }

        let field_types: Vec<ColumnType> = columns.iter().map(|c| c.column_type.clone()).collect();
        match self.canonical.field_types() {
            None => self.canonical.field_types = Some(field_types),
            Some(expected) if expected != field_types.as_slice() => {
                return Err(SchemaError::type_mismatch(
                    self.source_name,
                    self.sheet.name(),
                    &canonical_strings(expected),
                    &canonical_strings(&field_types),
                ))
            }
            Some(_) => {}
        }

        Ok(columns)
    }

    fn parse_type_cell(&self, raw: &str, location: CellLocation) -> SchemaResult<ColumnType> {
        parse_type_cell(raw).map_err(|e| match e {
            TypeCellError::Unsupported(tag) => {
                SchemaError::unsupported_type(self.source_name, self.sheet.name(), location, &tag)
            }
            TypeCellError::IllFormedEnum(reason) => {
                SchemaError::ill_formed_enum(self.source_name, self.sheet.name(), location, &reason)
            }
        })
    }
}

fn canonical_strings(types: &[ColumnType]) -> Vec<String> {
    types.iter().map(ColumnType::canonical).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaErrorCode;

    fn sheet(name: &str, header: Vec<Cell>, types: Option<Vec<Cell>>) -> Sheet {
        Sheet::new(name, vec![Some(Row::new(header)), types.map(Row::new)])
    }

    fn cells(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|v| Cell::from(*v)).collect()
    }

    #[test]
    fn test_parse_sets_canonical() {
        let sheet = sheet("Sheet1", cells(&[" ID ", "Name"]), Some(cells(&["int", "string"])));
        let mut canonical = CanonicalSchema::new();

        let parsed = SheetParser::new("Test.json", &sheet, &mut canonical).parse().unwrap();

        let SheetSchema::Columns(columns) = parsed else {
            panic!("expected columns");
        };
        assert_eq!(columns[0], ColumnSchema::new("id", ColumnType::Int));
        assert_eq!(columns[1], ColumnSchema::new("name", ColumnType::String));
        assert_eq!(canonical.field_names().unwrap(), &["id".to_string(), "name".to_string()]);
        assert!(canonical.is_complete());
    }

    #[test]
    fn test_blank_terminates_header() {
        let header = vec![Cell::from("id"), Cell::Blank, Cell::from("ignored")];
        let sheet = sheet("Sheet1", header, Some(cells(&["int"])));
        let mut canonical = CanonicalSchema::new();

        SheetParser::new("Test.json", &sheet, &mut canonical).parse().unwrap();
        assert_eq!(canonical.field_names().unwrap().len(), 1);
    }

    #[test]
    fn test_non_string_header_cell() {
        let header = vec![Cell::from("id"), Cell::from(3.0)];
        let sheet = sheet("Sheet1", header, Some(cells(&["int", "int"])));
        let mut canonical = CanonicalSchema::new();

        let err = SheetParser::new("Test.json", &sheet, &mut canonical).parse().unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::UnknownHeaderCell);
        assert_eq!(err.location(), Some(CellLocation::new(0, 1)));
        assert!(canonical.field_names().is_none());
    }

    #[test]
    fn test_duplicate_header() {
        let sheet = sheet("Sheet1", cells(&["id", "ID"]), Some(cells(&["int", "int"])));
        let mut canonical = CanonicalSchema::new();

        let err = SheetParser::new("Test.json", &sheet, &mut canonical).parse().unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::DuplicateField);
    }

    #[test]
    fn test_missing_type_row() {
        let sheet = sheet("Sheet1", cells(&["id"]), None);
        let mut canonical = CanonicalSchema::new();

        let err = SheetParser::new("Test.json", &sheet, &mut canonical).parse().unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::MissingTypeDefinition);
        assert_eq!(err.location(), None);
    }

    #[test]
    fn test_short_type_row() {
        let sheet = sheet("Sheet1", cells(&["id", "name"]), Some(cells(&["int"])));
        let mut canonical = CanonicalSchema::new();

        let err = SheetParser::new("Test.json", &sheet, &mut canonical).parse().unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::MissingTypeDefinition);
        assert_eq!(err.location(), Some(CellLocation::new(1, 1)));
    }

    #[test]
    fn test_unsupported_and_ill_formed_types() {
        let sheet1 = sheet("Sheet1", cells(&["id"]), Some(cells(&["long"])));
        let mut canonical = CanonicalSchema::new();
        let err = SheetParser::new("Test.json", &sheet1, &mut canonical).parse().unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::UnsupportedType);

        let sheet2 = sheet("Sheet2", cells(&["id"]), Some(cells(&["enum"])));
        let err = SheetParser::new("Test.json", &sheet2, &mut canonical).parse().unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::IllFormedEnum);

        let sheet3 = sheet("Sheet3", cells(&["id"]), Some(vec![Cell::from(true)]));
        let err = SheetParser::new("Test.json", &sheet3, &mut canonical).parse().unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::UnsupportedType);
    }

    #[test]
    fn test_header_mismatch_keeps_canonical() {
        let mut canonical = CanonicalSchema::new();
        let first = sheet("Sheet1", cells(&["id", "name"]), Some(cells(&["int", "string"])));
        let second = sheet("Sheet2", cells(&["id", "value"]), Some(cells(&["int", "string"])));

        SheetParser::new("Test.json", &first, &mut canonical).parse().unwrap();
        let err = SheetParser::new("Test.json", &second, &mut canonical).parse().unwrap_err();

        assert_eq!(err.code(), SchemaErrorCode::HeaderMismatch);
        assert_eq!(err.sheet_name(), "Sheet2");
        assert_eq!(canonical.field_names().unwrap()[1], "name");
    }

    #[test]
    fn test_type_mismatch() {
        let mut canonical = CanonicalSchema::new();
        let first = sheet("Sheet1", cells(&["id", "kind"]), Some(cells(&["int", "enum|a,b"])));
        let second = sheet("Sheet2", cells(&["id", "kind"]), Some(cells(&["int", "enum|b,a"])));

        SheetParser::new("Test.json", &first, &mut canonical).parse().unwrap();
        let err = SheetParser::new("Test.json", &second, &mut canonical).parse().unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::TypeMismatch);
    }

    #[test]
    fn test_empty_sheet_is_skipped() {
        let mut canonical = CanonicalSchema::new();
        let absent = Sheet::new("Blank", vec![]);
        let blank_header = sheet("BlankHeader", vec![Cell::Blank], None);

        assert_eq!(
            SheetParser::new("Test.json", &absent, &mut canonical).parse(),
            Ok(SheetSchema::Empty)
        );
        assert_eq!(
            SheetParser::new("Test.json", &blank_header, &mut canonical).parse(),
            Ok(SheetSchema::Empty)
        );
        assert_eq!(canonical, CanonicalSchema::new());
    }

    #[test]
    fn test_to_table_schema_requires_both_halves() {
        let mut canonical = CanonicalSchema::new();
        let sheet = sheet("Sheet1", cells(&["id"]), None);
        let _ = SheetParser::new("Test.json", &sheet, &mut canonical).parse();

        assert!(canonical.field_names().is_some());
        assert!(canonical.to_table_schema("Entity_Test").is_none());
    }
}
