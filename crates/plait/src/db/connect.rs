use crate::Result;

use plait_core::{
    async_trait, err,
    driver::{Connection, Driver},
};

use std::borrow::Cow;
use url::Url;

/// A driver chosen from a connection URL.
///
/// | URL | Driver |
/// |---|---|
/// | `memory:` | empty in-memory store (`memory` feature) |
/// | `sqlite::memory:` | in-memory SQLite database (`sqlite` feature) |
/// | `sqlite:<path>` | SQLite database file (`sqlite` feature) |
#[derive(Debug)]
pub struct Connect {
    driver: Box<dyn Driver>,
}

impl Connect {
    pub fn new(url: &str) -> Result<Self> {
        let parsed =
            Url::parse(url).map_err(|err| err!("invalid connection URL `{url}`: {err}"))?;

        let driver = match parsed.scheme() {
            "memory" => connect_memory(&parsed)?,
            "sqlite" => connect_sqlite(&parsed)?,
            scheme => {
                return Err(err!(
                    "unsupported storage; scheme={scheme}; url={url}"
                ))
            }
        };

        Ok(Self { driver })
    }
}

#[async_trait]
impl Driver for Connect {
    fn url(&self) -> Cow<'_, str> {
        self.driver.url()
    }

    async fn connect(&self) -> Result<Box<dyn Connection>> {
        self.driver.connect().await
    }

    fn max_connections(&self) -> Option<usize> {
        self.driver.max_connections()
    }
}

#[cfg(feature = "memory")]
fn connect_memory(_url: &Url) -> Result<Box<dyn Driver>> {
    Ok(Box::new(plait_driver_memory::Memory::new()))
}

#[cfg(not(feature = "memory"))]
fn connect_memory(_url: &Url) -> Result<Box<dyn Driver>> {
    Err(crate::Error::from(anyhow::anyhow!("`memory` feature not enabled")))
}

#[cfg(feature = "sqlite")]
fn connect_sqlite(url: &Url) -> Result<Box<dyn Driver>> {
    Ok(Box::new(plait_driver_sqlite::Sqlite::new(url.as_str())?))
}

#[cfg(not(feature = "sqlite"))]
fn connect_sqlite(_url: &Url) -> Result<Box<dyn Driver>> {
    Err(crate::Error::from(anyhow::anyhow!("`sqlite` feature not enabled")))
}
