use super::*;

/// A single relation stored on the source row.
///
/// The source table's `foreign_key` column holds the target's key. A null
/// foreign key, or one that matches no row, resolves to `Absent`.
#[derive(Debug, Clone)]
pub struct BelongsTo {
    /// Model the relation points at
    pub target: ModelId,

    /// Column of the source table holding the target key
    pub foreign_key: String,
}

impl BelongsTo {
    pub fn target<'a>(&self, schema: &'a Schema) -> &'a Model {
        schema.model(self.target)
    }
}

impl From<BelongsTo> for FieldTy {
    fn from(value: BelongsTo) -> Self {
        Self::BelongsTo(value)
    }
}
