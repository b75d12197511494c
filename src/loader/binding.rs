//! Binding of schema columns to entity members
//!
//! Generated entity types implement `TableEntity`. The binding from column
//! position to member slot is computed once per load, not per row.

use crate::schema::TableSchema;

use super::value::Value;

/// A type that rows can be loaded into
pub trait TableEntity: Default {
    /// Member names in slot order. Empty means members are addressed by
    /// column position.
    fn member_names() -> &'static [&'static str] {
        &[]
    }

    /// Stores `value` in the member at `slot`.
    ///
    /// Returns a description of the problem if the member cannot hold it.
    fn set_member(&mut self, slot: usize, value: Value) -> Result<(), String>;
}

/// Precomputed column-to-slot table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordBinding {
    slots: Vec<Option<usize>>,
}

impl RecordBinding {
    /// Column `i` goes to slot `i`
    pub fn positional(schema: &TableSchema) -> Self {
        Self {
            slots: (0..schema.len()).map(Some).collect(),
        }
    }

    /// Column goes to the member of the same (case-insensitive) name.
    /// Columns without a member are dropped.
    pub fn by_name(schema: &TableSchema, member_names: &[&str]) -> Self {
        let slots = schema
            .columns
            .iter()
            .map(|column| {
                member_names
                    .iter()
                    .position(|member| member.eq_ignore_ascii_case(&column.name))
            })
            .collect();
        Self { slots }
    }

    /// Binding for entity type `T`
    pub fn for_entity<T: TableEntity>(schema: &TableSchema) -> Self {
        let members = T::member_names();
        if members.is_empty() {
            Self::positional(schema)
        } else {
            Self::by_name(schema, members)
        }
    }

    /// Member slot of the column at `column`
    pub fn slot(&self, column: usize) -> Option<usize> {
        self.slots.get(column).copied().flatten()
    }

    /// Number of columns that reach a member
    pub fn bound_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}
