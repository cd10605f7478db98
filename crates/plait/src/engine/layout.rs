use plait_core::{
    driver::operation::Column,
    schema::{FieldTy, Model, ModelId, Schema},
    stmt,
};

use indexmap::{IndexMap, IndexSet};

/// Columns read for every row of one model, and where each field finds its
/// value in such a row.
#[derive(Debug)]
pub(crate) struct Layout {
    /// The key column always comes first
    pub(crate) columns: Vec<Column>,

    /// Row slot per field, indexed like `Model::fields`. Scalars read their
    /// own column, a `BelongsTo` reads its foreign key and relations stored on
    /// the target read the key.
    pub(crate) slots: Vec<usize>,
}

#[derive(Debug)]
pub(crate) struct Layouts {
    layouts: IndexMap<ModelId, Layout>,
}

pub(crate) const KEY_SLOT: usize = 0;

impl Layouts {
    pub(crate) fn new(schema: &Schema) -> Layouts {
        Layouts {
            layouts: schema
                .models()
                .map(|model| (model.id, Layout::new(schema, model)))
                .collect(),
        }
    }

    pub(crate) fn get(&self, id: ModelId) -> &Layout {
        self.layouts.get(&id).expect("layout for every model")
    }
}

impl Layout {
    fn new(schema: &Schema, model: &Model) -> Layout {
        let mut names = IndexSet::new();
        let mut columns = vec![];

        let mut push = |name: &str, ty: stmt::Type| {
            let (slot, inserted) = names.insert_full(name.to_string());
            if inserted {
                columns.push(Column::new(name, ty));
            }
            slot
        };

        let key = model.primary_key_field();
        push(key.name.storage_name(), storage_ty(schema, &key.expr_ty()));

        let slots = model
            .fields
            .iter()
            .map(|field| match &field.ty {
                FieldTy::Primitive(primitive) => {
                    push(field.name.storage_name(), storage_ty(schema, &primitive.ty))
                }
                FieldTy::BelongsTo(rel) => {
                    push(&rel.foreign_key, key_ty(schema, rel.target))
                }
                FieldTy::HasOne(_) | FieldTy::HasMany(_) => KEY_SLOT,
            })
            .collect();

        Layout { columns, slots }
    }

    pub(crate) fn key_column(&self) -> &Column {
        &self.columns[KEY_SLOT]
    }

    /// Row slot of the scalar stored in `column`.
    pub(crate) fn slot_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == column)
    }
}

/// The type of the key column of `model`.
pub(crate) fn key_ty(schema: &Schema, model: ModelId) -> stmt::Type {
    schema.model(model).primary_key_field().expr_ty()
}

/// Identifier references are stored as the referenced type's key.
fn storage_ty(schema: &Schema, ty: &stmt::Type) -> stmt::Type {
    match ty {
        stmt::Type::Id(model) => key_ty(schema, *model),
        ty => ty.clone(),
    }
}
