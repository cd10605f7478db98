use super::{Value, ValueRecord};
use crate::{
    schema::{Model, ModelId},
    Error, Result,
};

use indexmap::IndexMap;
use std::ops;

/// A validated instance of a composite type.
///
/// Values are keyed by field name and kept in the type's declaration order.
/// A `Record` can only be obtained through [`RecordBuilder::build`] or
/// [`Record::cast`], so its arity and per-field types always match the
/// declaration it was built against.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    model: ModelId,
    fields: IndexMap<String, Value>,
}

/// Named construction of a [`Record`].
///
/// Values are collected by field name and validated together in
/// [`build`](Self::build): every declared field needs exactly one value, no
/// undeclared name is accepted, and each value has to fit the field's type.
#[derive(Debug)]
pub struct RecordBuilder<'a> {
    model: &'a Model,
    values: Vec<(String, Value)>,
}

impl Record {
    pub fn builder(model: &Model) -> RecordBuilder<'_> {
        RecordBuilder {
            model,
            values: Vec::with_capacity(model.fields.len()),
        }
    }

    /// Explicit cast of a positional tuple to an instance of `model`.
    ///
    /// Checks the arity first, then every position against the field
    /// declared at that position.
    pub fn cast(model: &Model, row: ValueRecord) -> Result<Record> {
        if row.len() != model.fields.len() {
            return Err(Error::arity_mismatch(
                &model.name,
                model.fields.len(),
                row.len(),
            ));
        }

        let mut fields = IndexMap::with_capacity(model.fields.len());

        for (field, value) in model.fields.iter().zip(row) {
            let value = field
                .check(value)
                .map_err(|err| err.context(err!("field `{}.{}`", model.name, field.name())))?;
            fields.insert(field.name().to_string(), value);
        }

        Ok(Record {
            model: model.id,
            fields,
        })
    }

    pub fn model_id(&self) -> ModelId {
        self.model
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Value)> + '_ {
        self.fields.iter().map(|(name, value)| (&name[..], value))
    }

    pub fn names(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.fields.keys().map(|name| &name[..])
    }
}

impl ops::Index<&str> for Record {
    type Output = Value;

    #[track_caller]
    fn index(&self, name: &str) -> &Value {
        match self.fields.get(name) {
            Some(value) => value,
            None => panic!("record has no field `{name}`; fields={:?}", self.fields.keys()),
        }
    }
}

impl<'a> RecordBuilder<'a> {
    /// Supplies the value of the field called `name`.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.values.push((name.into(), value.into()));
        self
    }

    pub fn model(&self) -> &'a Model {
        self.model
    }

    pub fn build(self) -> Result<Record> {
        let model = self.model;
        let mut slots: Vec<Option<Value>> = vec![None; model.fields.len()];

        for (name, value) in self.values {
            let Some(field) = model.field_by_name(&name) else {
                return Err(Error::unknown_field(&model.name, &name));
            };

            let slot = &mut slots[field.id.index];

            if slot.is_some() {
                return Err(Error::duplicate_field(&model.name, &name));
            }

            *slot = Some(
                field
                    .check(value)
                    .map_err(|err| err.context(err!("field `{}.{}`", model.name, name)))?,
            );
        }

        let mut fields = IndexMap::with_capacity(model.fields.len());

        for (field, slot) in model.fields.iter().zip(slots) {
            let Some(value) = slot else {
                return Err(Error::missing_field(&model.name, field.name()));
            };
            fields.insert(field.name().to_string(), value);
        }

        Ok(Record {
            model: model.id,
            fields,
        })
    }
}
