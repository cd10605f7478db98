use super::layout::{key_ty, Layout, Layouts, KEY_SLOT};
use crate::{Error, Result};

use plait_core::{
    driver::{
        operation::{Column, SelectBy, SelectThrough},
        Connection, Operation,
    },
    schema::{BelongsTo, Field, FieldTy, HasMany, HasOne, Model, ModelId, Schema, Via},
    stmt::{Direction, Key, Record, Value, ValueRecord},
};

use indexmap::{IndexMap, IndexSet};
use std::{collections::HashMap, future::Future, pin::Pin};

type BoxFuture<'b, T> = Pin<Box<dyn Future<Output = T> + Send + 'b>>;

/// Executes the reads of one assembly on one connection.
///
/// Relations are loaded a level at a time: every relation field issues one
/// read covering all parent rows of the level, so the number of reads depends
/// on the depth of the type, not on the number of rows.
pub(super) struct Exec<'a> {
    schema: &'a Schema,
    layouts: &'a Layouts,
    conn: &'a mut dyn Connection,
}

/// A related row matched to the parent key it was found through.
struct Related {
    parent: Key,
    row: ValueRecord,
}

impl<'a> Exec<'a> {
    pub(super) fn new(
        schema: &'a Schema,
        layouts: &'a Layouts,
        conn: &'a mut dyn Connection,
    ) -> Exec<'a> {
        Exec {
            schema,
            layouts,
            conn,
        }
    }

    /// Assembles one record per key, in key order.
    pub(super) async fn assemble(&mut self, model: &'a Model, keys: &[Key]) -> Result<Vec<Record>> {
        let rows = self.load_roots(model, keys).await?;
        self.load(model, rows).await
    }

    /// Resolves a single field of the root identified by `key`.
    pub(super) async fn resolve_field(
        &mut self,
        model: &'a Model,
        field: &'a Field,
        key: Key,
    ) -> Result<Value> {
        let rows = self.load_roots(model, &[key]).await?;

        let mut values = self
            .resolve(model, field, &rows)
            .await
            .map_err(|err| err.context(Error::field_context(&model.name, field.name())))?;

        values
            .pop()
            .ok_or_else(|| Error::invalid_result("field resolution produced no value"))
    }

    fn layout(&self, id: ModelId) -> &'a Layout {
        self.layouts.get(id)
    }

    /// Reads the root rows, failing with `RootNotFound` for the first key
    /// without a row.
    async fn load_roots(&mut self, model: &Model, keys: &[Key]) -> Result<Vec<ValueRecord>> {
        let layout = self.layout(model.id);

        let rows = self
            .read(SelectBy {
                table: model.table.clone(),
                columns: layout.columns.clone(),
                filter_column: layout.key_column().name.clone(),
                keys: unique(keys.iter()),
            })
            .await?;

        let mut by_key = HashMap::with_capacity(rows.len());

        for row in rows {
            check_width(model, &row, layout.columns.len())?;

            let Some(key) = Key::from_value(&row[KEY_SLOT]) else {
                return Err(Error::invalid_result(format!(
                    "`{}` row without a key",
                    model.name
                )));
            };

            if by_key.insert(key.clone(), row).is_some() {
                return Err(Error::invalid_result(format!(
                    "more than one `{}` row with key {key}",
                    model.name
                )));
            }
        }

        keys.iter()
            .map(|key| {
                by_key
                    .get(key)
                    .cloned()
                    .ok_or_else(|| Error::root_not_found(&model.name, &Value::from(key.clone())))
            })
            .collect()
    }

    /// Turns rows of `model` into records, resolving every field for all rows
    /// at once.
    fn load<'b>(
        &'b mut self,
        model: &'a Model,
        rows: Vec<ValueRecord>,
    ) -> BoxFuture<'b, Result<Vec<Record>>> {
        Box::pin(async move {
            if rows.is_empty() {
                return Ok(vec![]);
            }

            let mut resolved = Vec::with_capacity(model.fields.len());

            for field in &model.fields {
                let values = self
                    .resolve(model, field, &rows)
                    .await
                    .map_err(|err| err.context(Error::field_context(&model.name, field.name())))?;

                debug_assert_eq!(values.len(), rows.len());
                resolved.push(values.into_iter());
            }

            tracing::trace!(ty = %model.name, rows = rows.len(), "all fields resolved; validating");

            let mut records = Vec::with_capacity(rows.len());

            for _ in 0..rows.len() {
                let mut builder = Record::builder(model);

                for (field, values) in model.fields.iter().zip(&mut resolved) {
                    let value = values.next().ok_or_else(|| {
                        Error::invalid_result(format!(
                            "field `{}.{}` resolved fewer values than rows",
                            model.name,
                            field.name()
                        ))
                    })?;
                    builder.set(field.name(), value);
                }

                records.push(builder.build()?);
            }

            Ok(records)
        })
    }

    /// Resolves `field` for every row, returning one value per row.
    async fn resolve(
        &mut self,
        model: &'a Model,
        field: &'a Field,
        rows: &[ValueRecord],
    ) -> Result<Vec<Value>> {
        let slot = self.layout(model.id).slots[field.id.index];

        tracing::debug!(
            ty = %model.name,
            field = field.name(),
            kind = ?field.kind(),
            parents = rows.len(),
            "resolving field"
        );

        match &field.ty {
            FieldTy::Primitive(_) => rows
                .iter()
                .map(|row| field.check(row[slot].clone()))
                .collect(),
            FieldTy::BelongsTo(rel) => self.resolve_belongs_to(rel, rows, slot).await,
            FieldTy::HasOne(rel) => self.resolve_has_one(model, rel, rows).await,
            FieldTy::HasMany(rel) => self.resolve_has_many(model, rel, rows).await,
        }
    }

    async fn resolve_belongs_to(
        &mut self,
        rel: &BelongsTo,
        rows: &[ValueRecord],
        slot: usize,
    ) -> Result<Vec<Value>> {
        let target = rel.target(self.schema);
        let foreign_keys: Vec<_> = rows.iter().map(|row| Key::from_value(&row[slot])).collect();

        let filter = self.layout(target.id).key_column().clone();
        let related = self
            .select_by(target, filter, foreign_keys.iter().flatten())
            .await?;

        let mut by_key = HashMap::with_capacity(related.len());

        for (parent, record) in self.load_related(target, related).await? {
            if by_key.insert(parent.clone(), record).is_some() {
                return Err(Error::invalid_result(format!(
                    "more than one `{}` row with key {parent}",
                    target.name
                )));
            }
        }

        Ok(foreign_keys
            .into_iter()
            .map(|key| match key.and_then(|key| by_key.get(&key)) {
                Some(record) => Value::Record(record.clone()),
                None => Value::Absent,
            })
            .collect())
    }

    async fn resolve_has_one(
        &mut self,
        model: &Model,
        rel: &HasOne,
        rows: &[ValueRecord],
    ) -> Result<Vec<Value>> {
        let target = rel.target(self.schema);
        let keys = parent_keys(rows);

        let filter = Column::new(&rel.pair, key_ty(self.schema, model.id));
        let related = self.select_by(target, filter, keys.iter().flatten()).await?;
        let groups = group(self.load_related(target, related).await?);

        keys.into_iter()
            .map(|key| {
                let Some(group) = key.and_then(|key| groups.get(&key)) else {
                    return Ok(Value::Absent);
                };

                match &group[..] {
                    [] => Ok(Value::Absent),
                    [(_, record)] => Ok(Value::Record(record.clone())),
                    _ => Err(Error::invalid_result(format!(
                        "{} `{}` rows for a single relation",
                        group.len(),
                        target.name
                    ))),
                }
            })
            .collect()
    }

    async fn resolve_has_many(
        &mut self,
        model: &Model,
        rel: &HasMany,
        rows: &[ValueRecord],
    ) -> Result<Vec<Value>> {
        let target = rel.target(self.schema);
        let keys = parent_keys(rows);

        let related = match &rel.via {
            Via::Column(pair) => {
                let filter = Column::new(pair, key_ty(self.schema, model.id));
                self.select_by(target, filter, keys.iter().flatten()).await?
            }
            Via::Link(link) => {
                let layout = self.layout(target.id);
                let source_keys = unique(keys.iter().flatten());

                if source_keys.is_empty() {
                    vec![]
                } else {
                    let rows = self
                        .read(SelectThrough {
                            link: link.clone(),
                            table: target.table.clone(),
                            key_column: layout.key_column().name.clone(),
                            columns: layout.columns.clone(),
                            keys: source_keys,
                        })
                        .await?;
                    split_parent(target, rows, layout.columns.len())?
                }
            }
        };

        // Sort keys are read with the target's own columns
        let order = match &rel.order_by {
            Some(order_by) => {
                let slot = self
                    .layout(target.id)
                    .slot_of(&order_by.column)
                    .ok_or_else(|| {
                        Error::invalid_schema(format!(
                            "`{}` has no column `{}` to order by",
                            target.name, order_by.column
                        ))
                    })?;
                Some((slot, order_by.direction))
            }
            None => None,
        };

        let sort_keys: Vec<Value> = match order {
            Some((slot, _)) => related.iter().map(|rel| rel.row[slot].clone()).collect(),
            None => vec![],
        };

        let mut groups = group(self.load_related(target, related).await?);

        if let Some((_, direction)) = order {
            for group in groups.values_mut() {
                group.sort_by(|(lhs, _), (rhs, _)| {
                    let ordering = sort_keys[*lhs].cmp_scalar(&sort_keys[*rhs]);
                    match direction {
                        Direction::Asc => ordering,
                        Direction::Desc => ordering.reverse(),
                    }
                });
            }
        }

        Ok(keys
            .into_iter()
            .map(|key| {
                let items = key
                    .and_then(|key| groups.get(&key))
                    .map(|group| {
                        group
                            .iter()
                            .map(|(_, record)| Value::Record(record.clone()))
                            .collect()
                    })
                    .unwrap_or_default();
                Value::List(items)
            })
            .collect())
    }

    /// Reads rows of `target` whose `filter` column matches one of `keys`.
    async fn select_by(
        &mut self,
        target: &Model,
        filter: Column,
        keys: impl Iterator<Item = &Key>,
    ) -> Result<Vec<Related>> {
        let keys = unique(keys);

        if keys.is_empty() {
            return Ok(vec![]);
        }

        let layout = self.layout(target.id);
        let mut columns = layout.columns.clone();
        let filter_column = filter.name.clone();
        columns.push(filter);

        let rows = self
            .read(SelectBy {
                table: target.table.clone(),
                columns,
                filter_column,
                keys,
            })
            .await?;

        split_parent(target, rows, layout.columns.len())
    }

    /// Loads the related rows into records, one level down.
    async fn load_related(
        &mut self,
        target: &'a Model,
        related: Vec<Related>,
    ) -> Result<Vec<(Key, Record)>> {
        let (parents, rows): (Vec<_>, Vec<_>) =
            related.into_iter().map(|rel| (rel.parent, rel.row)).unzip();

        let records = self.load(target, rows).await?;
        Ok(parents.into_iter().zip(records).collect())
    }

    async fn read(&mut self, op: impl Into<Operation>) -> Result<Vec<ValueRecord>> {
        let rows = self.conn.exec(op.into()).await?.rows.into_values()?;
        tracing::trace!(rows = rows.len(), "read complete");
        Ok(rows)
    }
}

/// Records of one relation field grouped by parent key, in read order. Each
/// record carries its position in the read so sort keys can be found.
fn group(related: Vec<(Key, Record)>) -> IndexMap<Key, Vec<(usize, Record)>> {
    let mut groups: IndexMap<Key, Vec<(usize, Record)>> = IndexMap::new();

    for (index, (parent, record)) in related.into_iter().enumerate() {
        groups.entry(parent).or_default().push((index, record));
    }

    groups
}

fn parent_keys(rows: &[ValueRecord]) -> Vec<Option<Key>> {
    rows.iter()
        .map(|row| Key::from_value(&row[KEY_SLOT]))
        .collect()
}

/// Distinct keys in first-seen order, as storage values.
fn unique<'k>(keys: impl Iterator<Item = &'k Key>) -> Vec<Value> {
    keys.collect::<IndexSet<_>>()
        .into_iter()
        .map(|key| Value::from(key.clone()))
        .collect()
}

/// Splits the trailing parent key off each row.
fn split_parent(target: &Model, rows: Vec<ValueRecord>, width: usize) -> Result<Vec<Related>> {
    rows.into_iter()
        .filter_map(|mut row| {
            if let Err(err) = check_width(target, &row, width + 1) {
                return Some(Err(err));
            }

            let parent = row.fields.pop().and_then(|value| Key::from_value(&value))?;
            Some(Ok(Related { parent, row }))
        })
        .collect()
}

fn check_width(model: &Model, row: &ValueRecord, width: usize) -> Result<()> {
    if row.len() == width {
        Ok(())
    } else {
        Err(Error::invalid_result(format!(
            "`{}` row has {} values, expected {width}",
            model.name,
            row.len()
        )))
    }
}
