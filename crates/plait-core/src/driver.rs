//! The storage seam.
//!
//! The engine never talks to a storage library directly. It issues
//! [`Operation`]s against a [`Connection`] obtained from a [`Driver`], and
//! every read of one assembly happens between a `Transaction::Start` and the
//! matching `Commit` or `Rollback`.

mod response;
pub use response::{Response, Rows};

pub mod operation;
pub use operation::Operation;

use crate::async_trait;

use std::{borrow::Cow, fmt::Debug};

#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Connection URL describing where the driver reads from
    fn url(&self) -> Cow<'_, str>;

    /// Opens a new connection.
    async fn connect(&self) -> crate::Result<Box<dyn Connection>>;

    /// Upper bound on concurrent connections, if the storage has one.
    fn max_connections(&self) -> Option<usize> {
        None
    }
}

#[async_trait]
pub trait Connection: Debug + Send + 'static {
    /// Execute a storage operation
    async fn exec(&mut self, op: Operation) -> crate::Result<Response>;
}

#[async_trait]
impl<T: Driver + ?Sized> Driver for Box<T> {
    fn url(&self) -> Cow<'_, str> {
        (**self).url()
    }

    async fn connect(&self) -> crate::Result<Box<dyn Connection>> {
        (**self).connect().await
    }

    fn max_connections(&self) -> Option<usize> {
        (**self).max_connections()
    }
}
