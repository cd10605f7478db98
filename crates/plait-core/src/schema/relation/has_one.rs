use super::*;

/// A single relation stored on the target row.
///
/// The target table's `pair` column holds the source's key. More than one
/// matching row is an invalid result.
#[derive(Debug, Clone)]
pub struct HasOne {
    /// Associated model
    pub target: ModelId,

    /// Column of the target table referencing the source key
    pub pair: String,
}

impl HasOne {
    pub fn target<'a>(&self, schema: &'a Schema) -> &'a Model {
        schema.model(self.target)
    }
}

impl From<HasOne> for FieldTy {
    fn from(value: HasOne) -> Self {
        Self::HasOne(value)
    }
}
