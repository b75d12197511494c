//! Row loader
//!
//! Reads the body rows of a sheet into typed records under a compiled
//! schema.
//!
//! Scan rules, per sheet:
//! - rows 0 and 1 are the header and type rows and are skipped
//! - an absent row, or a row whose first cell is blank, ends the sheet
//! - a row whose first cell is a string starting with `#` is a comment
//! - every other row yields one record with one value per column
//!
//! Formula cells are resolved to their cached result once, then coerced
//! like a literal cell of that kind.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::compiler::DescriptorRegistry;
use crate::observability::{log_event_with_fields, Event};
use crate::schema::{CellLocation, ColumnType, TableSchema};
use crate::workbook::{CachedResult, Cell, Row, Sheet, Workbook};

use super::binding::{RecordBinding, TableEntity};
use super::errors::{LoadError, LoadResult};
use super::value::{Record, Value};

const FIRST_BODY_ROW: usize = 2;
const COMMENT_PREFIX: char = '#';

/// What to do when a cell cannot be coerced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoercionPolicy {
    /// Fail the whole load
    #[default]
    Abort,
    /// Drop the offending row and keep going
    SkipRow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadOptions {
    pub on_coercion_error: CoercionPolicy,
}

impl LoadOptions {
    pub fn skip_invalid_rows() -> Self {
        Self {
            on_coercion_error: CoercionPolicy::SkipRow,
        }
    }
}

/// A cell after formula resolution
enum Resolved<'c> {
    Text(&'c str),
    Boolean(bool),
    Numeric(f64),
}

impl Resolved<'_> {
    fn kind_name(&self) -> &'static str {
        match self {
            Resolved::Text(_) => "string",
            Resolved::Boolean(_) => "boolean",
            Resolved::Numeric(_) => "numeric",
        }
    }
}

enum CellFault {
    Coercion(String),
    EnumDomain(String),
}

/// Loads rows of one source under one schema
pub struct RowLoader<'a> {
    schema: &'a TableSchema,
    source_name: &'a str,
    options: LoadOptions,
    names: Arc<[String]>,
}

impl<'a> RowLoader<'a> {
    pub fn new(schema: &'a TableSchema, source_name: &'a str) -> Self {
        Self {
            schema,
            source_name,
            options: LoadOptions::default(),
            names: schema.field_names().into(),
        }
    }

    pub fn with_options(mut self, options: LoadOptions) -> Self {
        self.options = options;
        self
    }

    /// Loads the records of one sheet
    pub fn load_sheet(&self, sheet: &Sheet) -> LoadResult<Vec<Record>> {
        self.scan(sheet, |_, values| Ok(Record::new(Arc::clone(&self.names), values)))
    }

    /// Loads the records of every sheet, in sheet order
    pub fn load_workbook(&self, workbook: &Workbook) -> LoadResult<Vec<Record>> {
        let mut records = Vec::new();
        for sheet in workbook.sheets() {
            records.extend(self.load_sheet(sheet)?);
        }
        Ok(records)
    }

    /// Loads one sheet into entity values
    pub fn load_sheet_into<T: TableEntity>(&self, sheet: &Sheet) -> LoadResult<Vec<T>> {
        let binding = RecordBinding::for_entity::<T>(self.schema);
        self.scan(sheet, |row_index, values| {
            self.bind(&binding, sheet, row_index, values)
        })
    }

    /// Loads every sheet into entity values
    pub fn load_workbook_into<T: TableEntity>(&self, workbook: &Workbook) -> LoadResult<Vec<T>> {
        let mut entities = Vec::new();
        for sheet in workbook.sheets() {
            entities.extend(self.load_sheet_into::<T>(sheet)?);
        }
        Ok(entities)
    }

    fn bind<T: TableEntity>(
        &self,
        binding: &RecordBinding,
        sheet: &Sheet,
        row_index: usize,
        values: Vec<Value>,
    ) -> LoadResult<T> {
        let mut entity = T::default();
        for (col, value) in values.into_iter().enumerate() {
            let Some(slot) = binding.slot(col) else {
                continue;
            };
            entity.set_member(slot, value).map_err(|reason| {
                LoadError::coercion(
                    self.source_name,
                    sheet.name(),
                    CellLocation::new(row_index, col),
                    &self.schema.columns[col].name,
                    reason,
                )
            })?;
        }
        Ok(entity)
    }

    fn scan<R, F>(&self, sheet: &Sheet, mut build: F) -> LoadResult<Vec<R>>
    where
        F: FnMut(usize, Vec<Value>) -> LoadResult<R>,
    {
        let mut output = Vec::new();

        for row_index in FIRST_BODY_ROW..sheet.row_count() {
            let Some(row) = sheet.row(row_index) else {
                break;
            };
            match row.cell(0) {
                None | Some(Cell::Blank) => break,
                Some(Cell::String(s)) if s.starts_with(COMMENT_PREFIX) => continue,
                _ => {}
            }

            let result = self
                .coerce_row(sheet, row_index, row)
                .and_then(|values| build(row_index, values));

            match result {
                Ok(item) => output.push(item),
                Err(error) => {
                    let message = error.to_string();
                    match self.options.on_coercion_error {
                        CoercionPolicy::Abort => {
                            log_event_with_fields(
                                Event::LoadAborted,
                                &[("message", &message), ("source", self.source_name)],
                            );
                            return Err(error);
                        }
                        CoercionPolicy::SkipRow => {
                            log_event_with_fields(
                                Event::RowSkipped,
                                &[("message", &message), ("source", self.source_name)],
                            );
                        }
                    }
                }
            }
        }

        Ok(output)
    }

    fn coerce_row(&self, sheet: &Sheet, row_index: usize, row: &Row) -> LoadResult<Vec<Value>> {
        let mut values = Vec::with_capacity(self.schema.len());

        for (col, column) in self.schema.columns.iter().enumerate() {
            let value = coerce_cell(&column.column_type, row.cell(col)).map_err(|fault| {
                let location = CellLocation::new(row_index, col);
                match fault {
                    CellFault::Coercion(reason) => LoadError::coercion(
                        self.source_name,
                        sheet.name(),
                        location,
                        &column.name,
                        reason,
                    ),
                    CellFault::EnumDomain(value) => LoadError::enum_domain(
                        self.source_name,
                        sheet.name(),
                        location,
                        &column.name,
                        &value,
                        column.enum_domain().unwrap_or_default(),
                    ),
                }
            })?;
            values.push(value);
        }

        Ok(values)
    }
}

fn coerce_cell(column_type: &ColumnType, cell: Option<&Cell>) -> Result<Value, CellFault> {
    let resolved = match cell {
        None | Some(Cell::Blank) | Some(Cell::Unknown) => return Ok(Value::zero(column_type)),
        Some(Cell::String(s)) => Resolved::Text(s),
        Some(Cell::Boolean(b)) => Resolved::Boolean(*b),
        Some(Cell::Numeric(n)) => Resolved::Numeric(*n),
        Some(Cell::Formula { cached, .. }) => match cached {
            Some(CachedResult::String(s)) => Resolved::Text(s),
            Some(CachedResult::Boolean(b)) => Resolved::Boolean(*b),
            Some(CachedResult::Numeric(n)) => Resolved::Numeric(*n),
            Some(CachedResult::Error) | None => return Ok(Value::zero(column_type)),
        },
    };

    match (column_type, resolved) {
        (ColumnType::String, Resolved::Text(s)) => Ok(Value::String(s.to_string())),
        (ColumnType::Bool, Resolved::Boolean(b)) => Ok(Value::Bool(b)),
        (ColumnType::Float, Resolved::Numeric(n)) => Ok(Value::Float(n)),
        (ColumnType::Int, Resolved::Numeric(n)) => coerce_int(n).map(Value::Int),
        (ColumnType::Enum { domain }, Resolved::Text(s)) => {
            let wanted = s.trim().to_lowercase();
            domain
                .iter()
                .position(|v| *v == wanted)
                .map(|ordinal| Value::Enum {
                    ordinal,
                    label: domain[ordinal].clone(),
                })
                .ok_or_else(|| CellFault::EnumDomain(s.to_string()))
        }
        (expected, other) => Err(CellFault::Coercion(format!(
            "{} field cannot hold a {} cell",
            expected.tag(),
            other.kind_name()
        ))),
    }
}

/// Rounds half-to-even and checks the result fits in an i64
fn coerce_int(n: f64) -> Result<i64, CellFault> {
    let rounded = n.round_ties_even();
    // i64::MAX as f64 is 2^63, which is itself out of range
    if !rounded.is_finite() || rounded < i64::MIN as f64 || rounded >= i64::MAX as f64 {
        return Err(CellFault::Coercion(format!(
            "{} does not fit in an int field",
            n
        )));
    }
    Ok(rounded as i64)
}

/// Loads one sheet with default options
pub fn load(schema: &TableSchema, sheet: &Sheet) -> LoadResult<Vec<Record>> {
    RowLoader::new(schema, &schema.entity_name).load_sheet(sheet)
}

/// Loads a workbook using the registered descriptor of `entity_name`
pub fn load_with_registry(
    registry: &DescriptorRegistry,
    entity_name: &str,
    source_name: &str,
    workbook: &Workbook,
    options: LoadOptions,
) -> LoadResult<Vec<Record>> {
    let descriptor = registry
        .get(entity_name)
        .ok_or_else(|| LoadError::schema_unavailable(source_name, entity_name))?;
    let schema = descriptor
        .to_schema()
        .map_err(|reason| LoadError::invalid_descriptor(source_name, reason))?;

    RowLoader::new(&schema, source_name)
        .with_options(options)
        .load_workbook(workbook)
}
