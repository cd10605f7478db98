use super::{Column, Operation};
use crate::{schema::Link, stmt};

/// Reads the rows of `table` paired with source keys through a link table.
///
/// Equivalent to
///
/// ```sql
/// SELECT t.columns..., l.source_column
/// FROM link l JOIN table t ON t.key_column = l.target_column
/// WHERE l.source_column IN (keys)
/// ```
///
/// A target row appears once per link row pointing at it. Each response row
/// holds `columns` in order followed by the link's source key, returned as
/// stored.
#[derive(Debug, Clone)]
pub struct SelectThrough {
    /// The link table and its two key columns
    pub link: Link,

    /// Target table
    pub table: String,

    /// Target column matched against the link's target column
    pub key_column: String,

    /// Target columns to return
    pub columns: Vec<Column>,

    /// Source keys to fetch
    pub keys: Vec<stmt::Value>,
}

impl From<SelectThrough> for Operation {
    fn from(value: SelectThrough) -> Self {
        Self::SelectThrough(value)
    }
}
