//! The type registry.
//!
//! Composite types are declared with [`ModelDef`] and registered with a
//! [`Builder`]. Building resolves type names, checks that relation fields
//! cannot nest forever, and produces an immutable [`Schema`] that is shared
//! by every assembly request.

mod builder;
pub use builder::Builder;

mod def;
pub use def::{FieldDef, ModelDef, ScalarTy};

mod field;
pub use field::{Field, FieldId, FieldKind, FieldName, FieldPrimitive, FieldTy};

mod model;
pub use model::{Model, ModelId};

mod relation;
pub use relation::{BelongsTo, HasMany, HasOne, Link, OrderBy, Via};

mod verify;

use crate::{Error, Result};
use indexmap::IndexMap;

#[derive(Debug)]
pub struct Schema {
    /// Distinguishes registries built at different times
    pub version: u64,

    pub models: IndexMap<ModelId, Model>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Get a field by ID
    pub fn field(&self, id: FieldId) -> &Field {
        self.model(id.model)
            .fields
            .get(id.index)
            .expect("invalid field ID")
    }

    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.models.values()
    }

    /// Get a model by ID
    pub fn model(&self, id: impl Into<ModelId>) -> &Model {
        self.models.get(&id.into()).expect("invalid model ID")
    }

    /// Look up a composite type by its registered name.
    pub fn model_by_name(&self, name: &str) -> Result<&Model> {
        self.models
            .values()
            .find(|model| model.name == name)
            .ok_or_else(|| Error::unknown_type(name))
    }
}
