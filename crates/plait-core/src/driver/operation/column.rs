use crate::stmt;

/// A column to read, with the type the caller expects back.
///
/// Drivers whose storage does not keep every type natively (SQLite stores
/// booleans as integers) use `ty` to decode values. A stored value that does
/// not fit `ty` is returned as stored and rejected by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub ty: stmt::Type,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: stmt::Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}
