use plait_core::stmt::{Key, Value, ValueRecord};

use indexmap::IndexMap;
use std::sync::Arc;

/// A stored row: column name to value.
pub type Row = IndexMap<String, Value>;

/// One immutable version of the stored tables.
///
/// Tables are shared between versions until a writer touches them.
#[derive(Debug, Clone, Default)]
pub struct Store {
    pub(crate) version: u64,
    tables: IndexMap<String, Arc<Vec<Row>>>,
}

impl Store {
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Rows of `table` in insertion order. Unknown tables are empty.
    pub fn rows(&self, table: &str) -> &[Row] {
        self.tables.get(table).map(|rows| &rows[..]).unwrap_or(&[])
    }

    pub(crate) fn table_mut(&mut self, table: &str) -> &mut Vec<Row> {
        Arc::make_mut(self.tables.entry(table.to_string()).or_default())
    }
}

/// Value of `column`; missing columns read as `Null`.
pub(crate) fn value_of(row: &Row, column: &str) -> Value {
    row.get(column).cloned().unwrap_or_default()
}

pub(crate) fn key_of(row: &Row, column: &str) -> Option<Key> {
    row.get(column).and_then(Key::from_value)
}

pub(crate) fn project<'c>(row: &Row, columns: impl Iterator<Item = &'c str>) -> ValueRecord {
    ValueRecord::from_vec(columns.map(|column| value_of(row, column)).collect())
}
