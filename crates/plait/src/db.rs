mod builder;
mod connect;
mod pool;

pub use builder::Builder;
pub use connect::*;
pub use pool::*;

use crate::{engine::Engine, Error, Result};

use plait_core::{
    err,
    schema::{FieldKind, Model},
    stmt::{Record, Value},
    Schema,
};

use std::sync::Arc;

/// A handle for assembling records.
///
/// Cloning is cheap and clones share the schema and the connection pool.
/// Every call checks out its own connection, so calls on the same handle may
/// run in parallel.
#[derive(Debug, Clone)]
pub struct Db {
    engine: Engine,
    pool: Pool,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Assembles the `ty` record whose key is `root`.
    ///
    /// Fails with `RootNotFound` when no row has that key and with
    /// `UnknownType` when `ty` is not registered. Field failures abort the
    /// whole assembly and name the field they happened in.
    pub async fn assemble(&self, root: impl Into<Value>, ty: &str) -> Result<Record> {
        let mut records = self.assemble_many([root.into()], ty).await?;
        records
            .pop()
            .ok_or_else(|| Error::invalid_result("assembly produced no record"))
    }

    /// Assembles several roots of the same type in one snapshot.
    ///
    /// Records are returned in input order. The first missing root fails the
    /// whole call.
    pub async fn assemble_many<I>(&self, roots: I, ty: &str) -> Result<Vec<Record>>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let model = self.model(ty)?;
        let roots: Vec<Value> = roots.into_iter().map(Into::into).collect();

        if roots.is_empty() {
            return Ok(vec![]);
        }

        let mut connection = self.pool.get().await?;
        self.engine.assemble(&mut **connection, model, roots).await
    }

    /// Resolves a scalar field of one root.
    pub async fn resolve_scalar(
        &self,
        root: impl Into<Value>,
        ty: &str,
        field: &str,
    ) -> Result<Value> {
        self.resolve(root.into(), ty, field, FieldKind::Scalar).await
    }

    /// Resolves a single relation of one root to a record or `Value::Absent`.
    pub async fn resolve_single_relation(
        &self,
        root: impl Into<Value>,
        ty: &str,
        field: &str,
    ) -> Result<Value> {
        self.resolve(root.into(), ty, field, FieldKind::SingleRelation)
            .await
    }

    /// Resolves a collection relation of one root. An empty collection is an
    /// empty vector.
    pub async fn resolve_collection(
        &self,
        root: impl Into<Value>,
        ty: &str,
        field: &str,
    ) -> Result<Vec<Record>> {
        let value = self
            .resolve(root.into(), ty, field, FieldKind::CollectionRelation)
            .await?;

        let Value::List(items) = value else {
            return Err(Error::invalid_result(format!(
                "collection `{ty}.{field}` resolved to {}",
                value.kind_name()
            )));
        };

        items
            .into_iter()
            .map(|item| match item {
                Value::Record(record) => Ok(record),
                item => Err(Error::invalid_result(format!(
                    "collection `{ty}.{field}` holds {}",
                    item.kind_name()
                ))),
            })
            .collect()
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.engine.schema
    }

    /// Returns the connection pool.
    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    fn model(&self, ty: &str) -> Result<&Model> {
        self.engine.schema.model_by_name(ty)
    }

    async fn resolve(&self, root: Value, ty: &str, name: &str, kind: FieldKind) -> Result<Value> {
        let model = self.model(ty)?;
        let Some(field) = model.field_by_name(name) else {
            return Err(Error::unknown_field(&model.name, name));
        };

        if field.kind() != kind {
            return Err(err!(
                "field `{}.{}` is {:?}, not {:?}",
                model.name,
                name,
                field.kind(),
                kind
            ));
        }

        let mut connection = self.pool.get().await?;
        self.engine
            .resolve_field(&mut **connection, model, field, root)
            .await
    }
}
