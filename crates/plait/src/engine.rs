mod exec;
use exec::Exec;

mod layout;
use layout::Layouts;

use crate::{Error, Result};

use plait_core::{
    driver::{operation::Transaction, Connection},
    schema::{Field, Model},
    stmt::{Key, Record, Value},
    Schema,
};

use std::sync::Arc;
use tracing::Instrument;

/// Resolves records against a connection.
///
/// Holds no per-request state: every call works on its own connection, so
/// one engine serves any number of concurrent assemblies.
#[derive(Debug, Clone)]
pub(crate) struct Engine {
    /// The schema being managed by the DB
    pub(crate) schema: Arc<Schema>,

    /// Columns read per model, computed once per schema
    layouts: Arc<Layouts>,
}

impl Engine {
    pub(crate) fn new(schema: Arc<Schema>) -> Engine {
        let layouts = Arc::new(Layouts::new(&schema));
        Engine { schema, layouts }
    }

    /// Assembles one record per root, in root order, inside one read
    /// snapshot.
    pub(crate) async fn assemble(
        &self,
        conn: &mut dyn Connection,
        model: &Model,
        roots: Vec<Value>,
    ) -> Result<Vec<Record>> {
        let keys = roots
            .into_iter()
            .map(|root| root_key(model, root))
            .collect::<Result<Vec<_>>>()?;

        let span = tracing::debug_span!("assemble", ty = %model.name, roots = keys.len());

        async move {
            let model = self.schema.model(model.id);
            tracing::debug!(fields = model.fields.len(), "fields pending");

            begin(conn).await?;
            let res = Exec::new(&self.schema, &self.layouts, &mut *conn)
                .assemble(model, &keys)
                .await;
            finish(conn, res).await
        }
        .instrument(span)
        .await
    }

    /// Resolves one field of one root inside one read snapshot.
    pub(crate) async fn resolve_field(
        &self,
        conn: &mut dyn Connection,
        model: &Model,
        field: &Field,
        root: Value,
    ) -> Result<Value> {
        let key = root_key(model, root)?;
        let span = tracing::debug_span!("resolve", ty = %model.name, field = field.name(), root = %key);

        async move {
            let model = self.schema.model(model.id);
            let field = model.field(field.id);

            begin(conn).await?;
            let res = Exec::new(&self.schema, &self.layouts, &mut *conn)
                .resolve_field(model, field, key)
                .await;
            finish(conn, res).await
        }
        .instrument(span)
        .await
    }
}

/// Checks a root identifier against the key field and turns it into a key.
fn root_key(model: &Model, root: Value) -> Result<Key> {
    let field = model.primary_key_field();
    let ty = field.expr_ty();
    let value = ty.cast(root)?;

    Key::from_value(&value).ok_or_else(|| Error::type_mismatch(&ty, &value))
}

async fn begin(conn: &mut dyn Connection) -> Result<()> {
    conn.exec(Transaction::Start { read_only: true }.into())
        .await?;
    Ok(())
}

/// Ends the snapshot: commit on success, rollback on failure. The original
/// failure wins over a rollback failure.
async fn finish<T>(conn: &mut dyn Connection, res: Result<T>) -> Result<T> {
    match res {
        Ok(value) => {
            conn.exec(Transaction::Commit.into()).await?;
            tracing::debug!("done");
            Ok(value)
        }
        Err(err) => {
            tracing::debug!(error = %err, "assembly failed");

            if let Err(rollback) = conn.exec(Transaction::Rollback.into()).await {
                tracing::warn!(error = %rollback, "rollback after failed assembly");
            }

            Err(err)
        }
    }
}
