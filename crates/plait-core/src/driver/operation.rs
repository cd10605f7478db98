mod column;
pub use column::Column;

mod select_by;
pub use select_by::SelectBy;

mod select_through;
pub use select_through::SelectThrough;

mod transaction;
pub use transaction::Transaction;

#[derive(Debug, Clone)]
pub enum Operation {
    /// Read rows of one table whose filter column matches any of the keys
    SelectBy(SelectBy),

    /// Read rows of one table paired with source keys through a link table
    SelectThrough(SelectThrough),

    /// Execute a transaction lifecycle op
    Transaction(Transaction),
}

impl Operation {
    pub fn is_read(&self) -> bool {
        matches!(self, Self::SelectBy(_) | Self::SelectThrough(_))
    }

    /// Table the operation reads from, if any
    pub fn table(&self) -> Option<&str> {
        match self {
            Self::SelectBy(op) => Some(&op.table),
            Self::SelectThrough(op) => Some(&op.table),
            Self::Transaction(_) => None,
        }
    }
}
