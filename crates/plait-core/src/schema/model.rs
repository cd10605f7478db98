use super::{Field, FieldId, FieldTy};

use std::fmt;

#[derive(Debug, Clone)]
pub struct Model {
    /// Uniquely identifies the model within the schema
    pub id: ModelId,

    /// Name the type was registered under
    pub name: String,

    /// Storage table holding one row per instance
    pub table: String,

    /// Fields in declaration order
    pub fields: Vec<Field>,

    /// The key field. Root identifiers and relation keys are matched against
    /// its column.
    pub primary_key: FieldId,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ModelId(pub usize);

impl Model {
    pub fn field(&self, field: impl Into<FieldId>) -> &Field {
        let field_id = field.into();
        assert_eq!(self.id, field_id.model);
        &self.fields[field_id.index]
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name.app_name == name)
    }

    pub fn primary_key_field(&self) -> &Field {
        self.field(self.primary_key)
    }

    /// Iterates the models this model nests through relation fields.
    pub fn relation_targets(&self) -> impl Iterator<Item = ModelId> + '_ {
        self.fields.iter().filter_map(|field| match &field.ty {
            FieldTy::Primitive(_) => None,
            FieldTy::BelongsTo(rel) => Some(rel.target),
            FieldTy::HasOne(rel) => Some(rel.target),
            FieldTy::HasMany(rel) => Some(rel.target),
        })
    }
}

impl ModelId {
    /// Create a `FieldId` representing the current model's field at index
    /// `index`.
    pub const fn field(self, index: usize) -> FieldId {
        FieldId { model: self, index }
    }
}

impl From<&Self> for ModelId {
    fn from(src: &Self) -> Self {
        *src
    }
}

impl From<&Model> for ModelId {
    fn from(value: &Model) -> Self {
        value.id
    }
}

impl fmt::Debug for ModelId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ModelId({})", self.0)
    }
}
