//! Connection pooling for storage connections.

use std::ops::{Deref, DerefMut};

use plait_core::driver::{Connection, Driver};

use crate::{Error, Result};

/// Get the default maximum size of a pool, which is `cpu_core_count * 2`
/// including logical cores (Hyper-Threading).
fn get_default_pool_max_size() -> usize {
    deadpool::managed::PoolConfig::default().max_size
}

/// A connection pool that manages storage connections.
#[derive(Debug, Clone)]
pub struct Pool {
    inner: deadpool::managed::Pool<Manager>,
    url: String,
}

impl Pool {
    /// Creates a new connection pool from the given driver.
    ///
    /// One connection is opened eagerly so an unreachable storage fails here
    /// rather than on the first assembly.
    pub async fn new(driver: impl Driver, max_connections: Option<usize>) -> Result<Self> {
        let url = driver.url().into_owned();
        let max_size = match (max_connections, driver.max_connections()) {
            (Some(requested), Some(limit)) => requested.min(limit),
            (requested, limit) => requested.or(limit).unwrap_or_else(get_default_pool_max_size),
        };

        // An empty pool never hands out a connection
        if max_size == 0 {
            return Err(Error::invalid_configuration(format!(
                "pool for `{url}` must allow at least one connection"
            )));
        }

        let inner = deadpool::managed::Pool::builder(Manager {
            driver: Box::new(driver),
        })
        .runtime(deadpool::Runtime::Tokio1)
        .max_size(max_size)
        .build()
        .map_err(Error::connection_pool)?;

        let pool = Self { inner, url };
        drop(pool.get().await?);

        tracing::debug!(url = %pool.url, max_size, "connection pool ready");
        Ok(pool)
    }

    /// Retrieves a connection from the pool.
    pub async fn get(&self) -> Result<PoolConnection> {
        let connection = self.inner.get().await.map_err(|err| match err {
            // Storage errors raised while connecting keep their own kind
            deadpool::managed::PoolError::Backend(err) => err,
            err => Error::connection_pool(err),
        })?;
        Ok(PoolConnection { inner: connection })
    }

    /// URL of the storage behind the pool.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Maximum number of connections the pool holds.
    pub fn max_size(&self) -> usize {
        self.inner.status().max_size
    }
}

#[derive(Debug)]
struct Manager {
    driver: Box<dyn Driver>,
}

impl deadpool::managed::Manager for Manager {
    type Type = Box<dyn Connection>;
    type Error = Error;

    async fn create(&self) -> Result<Self::Type> {
        self.driver.connect().await
    }

    async fn recycle(
        &self,
        _obj: &mut Self::Type,
        _metrics: &deadpool::managed::Metrics,
    ) -> deadpool::managed::RecycleResult<Self::Error> {
        Ok(())
    }
}

/// A connection retrieved from a pool.
///
/// When dropped, the connection is returned to the pool for reuse.
pub struct PoolConnection {
    inner: deadpool::managed::Object<Manager>,
}

impl Deref for PoolConnection {
    type Target = Box<dyn Connection>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for PoolConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}
