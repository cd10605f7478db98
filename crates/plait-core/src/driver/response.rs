use crate::{stmt::ValueRecord, Error, Result};

#[derive(Debug)]
pub struct Response {
    pub rows: Rows,
}

#[derive(Debug)]
pub enum Rows {
    /// Number of rows impacted by the operation
    Count(u64),

    /// Operation result, one positional record per row
    Values(Vec<ValueRecord>),
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self {
            rows: Rows::Count(count),
        }
    }

    pub fn values(values: impl Into<Vec<ValueRecord>>) -> Self {
        Self {
            rows: Rows::Values(values.into()),
        }
    }

    pub fn empty_values() -> Self {
        Self {
            rows: Rows::Values(vec![]),
        }
    }
}

impl Rows {
    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count(_))
    }

    pub fn is_values(&self) -> bool {
        matches!(self, Self::Values(_))
    }

    /// Returns the rows of a read, failing if the driver answered with a
    /// count.
    pub fn into_values(self) -> Result<Vec<ValueRecord>> {
        match self {
            Self::Values(values) => Ok(values),
            Self::Count(count) => Err(Error::invalid_result(format!(
                "expected rows, driver returned a count of {count}"
            ))),
        }
    }
}
