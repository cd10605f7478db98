use super::{Connect, Db, Pool};
use crate::{engine::Engine, Result};

use plait_core::{
    driver::Driver,
    schema::{self, ModelDef},
    Schema,
};

use std::sync::Arc;

/// Configures a [`Db`]: the composite types it assembles and the
/// storage it reads from.
///
/// All types are registered before the handle exists; the schema is
/// immutable once built.
#[derive(Debug, Default)]
pub struct Builder {
    /// Schema builder
    core: schema::Builder,

    /// Pool size requested by the caller
    max_connections: Option<usize>,
}

impl Builder {
    pub fn register(&mut self, def: ModelDef) -> Result<&mut Self> {
        self.core.register(def)?;
        Ok(self)
    }

    /// Caps the number of pooled connections. A smaller limit reported by the
    /// driver wins.
    pub fn max_connections(&mut self, max_connections: usize) -> &mut Self {
        self.max_connections = Some(max_connections);
        self
    }

    pub fn build_schema(&self) -> Result<Schema> {
        self.core.build()
    }

    pub async fn connect(&mut self, url: &str) -> Result<Db> {
        self.build(Connect::new(url)?).await
    }

    pub async fn build(&mut self, driver: impl Driver) -> Result<Db> {
        let schema = Arc::new(self.build_schema()?);
        let engine = Engine::new(schema);
        let pool = Pool::new(driver, self.max_connections).await?;

        tracing::debug!(
            url = %pool.url(),
            version = engine.schema.version,
            "db ready"
        );

        Ok(Db { engine, pool })
    }
}
