use super::{Column, Operation};
use crate::stmt;

/// `SELECT columns FROM table WHERE filter_column IN (keys)`
///
/// Rows come back in storage order, each holding `columns` in the requested
/// order. Null keys never match.
#[derive(Debug, Clone)]
pub struct SelectBy {
    /// Which table to read
    pub table: String,

    /// Which columns to return
    pub columns: Vec<Column>,

    /// Column compared against the keys
    pub filter_column: String,

    /// Which keys to fetch
    pub keys: Vec<stmt::Value>,
}

impl From<SelectBy> for Operation {
    fn from(value: SelectBy) -> Self {
        Self::SelectBy(value)
    }
}
