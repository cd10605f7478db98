use super::{FieldTy, ModelId, Schema, Via};
use crate::{Error, Result};

use std::collections::HashMap;

struct Verify<'a> {
    schema: &'a Schema,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

impl Schema {
    pub(super) fn verify(&self) -> Result<()> {
        Verify { schema: self }.verify()
    }
}

impl Verify<'_> {
    fn verify(&self) -> Result<()> {
        for model in self.schema.models() {
            self.verify_key_is_scalar(model.id)?;
            self.verify_columns_are_named(model.id)?;
            self.verify_order_by_is_scalar(model.id)?;
        }

        self.verify_nesting_is_acyclic()
    }

    fn verify_key_is_scalar(&self, id: ModelId) -> Result<()> {
        let model = self.schema.model(id);
        let key = model.primary_key_field();

        match &key.ty {
            FieldTy::Primitive(primitive)
                if primitive.ty.is_scalar() && !primitive.ty.is_id() && !key.nullable =>
            {
                Ok(())
            }
            _ => Err(Error::invalid_schema(format!(
                "key field `{}.{}` must be a non-nullable plain scalar",
                model.name,
                key.name()
            ))),
        }
    }

    fn verify_columns_are_named(&self, id: ModelId) -> Result<()> {
        let model = self.schema.model(id);

        for field in &model.fields {
            let columns: Vec<&str> = match &field.ty {
                FieldTy::Primitive(_) => vec![field.name.storage_name()],
                FieldTy::BelongsTo(rel) => vec![&rel.foreign_key],
                FieldTy::HasOne(rel) => vec![&rel.pair],
                FieldTy::HasMany(rel) => {
                    let mut columns = match &rel.via {
                        Via::Column(column) => vec![&column[..]],
                        Via::Link(link) => vec![
                            &link.table[..],
                            &link.source_column[..],
                            &link.target_column[..],
                        ],
                    };
                    columns.extend(rel.order_by.as_ref().map(|order| &order.column[..]));
                    columns
                }
            };

            if columns.iter().any(|column| column.is_empty()) {
                return Err(Error::invalid_schema(format!(
                    "field `{}.{}` maps to an empty storage name",
                    model.name,
                    field.name()
                )));
            }
        }

        if model.table.is_empty() {
            return Err(Error::invalid_schema(format!(
                "type `{}` has an empty table name",
                model.name
            )));
        }

        Ok(())
    }

    /// Ordering columns are read with the target's own columns, so they have
    /// to belong to a scalar field of the target.
    fn verify_order_by_is_scalar(&self, id: ModelId) -> Result<()> {
        let model = self.schema.model(id);

        for field in &model.fields {
            let Some(rel) = field.ty.as_has_many() else {
                continue;
            };
            let Some(order_by) = &rel.order_by else {
                continue;
            };

            let target = rel.target(self.schema);
            let found = target.fields.iter().any(|field| {
                field.ty.is_primitive() && field.name.storage_name() == order_by.column
            });

            if !found {
                return Err(Error::invalid_schema(format!(
                    "field `{}.{}` orders by `{}`, which is not a scalar column of `{}`",
                    model.name,
                    field.name(),
                    order_by.column,
                    target.name
                )));
            }
        }

        Ok(())
    }

    /// Registration already rejects cycles one declaration at a time; this
    /// re-checks the resolved graph as a whole.
    fn verify_nesting_is_acyclic(&self) -> Result<()> {
        let mut marks = HashMap::new();
        let mut path = vec![];

        for model in self.schema.models() {
            self.visit(model.id, &mut marks, &mut path)?;
        }

        Ok(())
    }

    fn visit(
        &self,
        id: ModelId,
        marks: &mut HashMap<ModelId, Mark>,
        path: &mut Vec<ModelId>,
    ) -> Result<()> {
        match marks.get(&id) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => {
                let start = path.iter().position(|step| *step == id).unwrap_or(0);
                let names = path[start..]
                    .iter()
                    .chain([&id])
                    .map(|step| &self.schema.model(*step).name);
                return Err(Error::cyclic_type(names));
            }
            None => {}
        }

        marks.insert(id, Mark::Visiting);
        path.push(id);

        for target in self.schema.model(id).relation_targets() {
            self.visit(target, marks, path)?;
        }

        path.pop();
        marks.insert(id, Mark::Done);
        Ok(())
    }
}
