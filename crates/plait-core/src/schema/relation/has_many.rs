use super::*;
use crate::stmt::Direction;

/// A collection relation.
#[derive(Debug, Clone)]
pub struct HasMany {
    /// Associated model
    pub target: ModelId,

    /// Where the rows linking source and target live
    pub via: Via,

    /// Explicit ordering rule. Without one, elements keep storage order and
    /// consumers should treat the collection as a set.
    pub order_by: Option<OrderBy>,
}

/// How the target rows of a collection are found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Via {
    /// The target table has a column referencing the source key
    Column(String),

    /// A link table pairs source keys with target keys
    Link(Link),
}

/// A join table between two types, e.g. `enrollment(class_id, student_id)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub table: String,

    /// Link column holding the source key
    pub source_column: String,

    /// Link column holding the target key
    pub target_column: String,
}

/// Stable sort key applied to the elements of a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Column of the target table to sort by
    pub column: String,

    pub direction: Direction,
}

impl HasMany {
    pub fn target<'a>(&self, schema: &'a Schema) -> &'a Model {
        schema.model(self.target)
    }
}

impl Link {
    pub fn new(
        table: impl Into<String>,
        source_column: impl Into<String>,
        target_column: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            source_column: source_column.into(),
            target_column: target_column.into(),
        }
    }
}

impl From<HasMany> for FieldTy {
    fn from(value: HasMany) -> Self {
        Self::HasMany(value)
    }
}
