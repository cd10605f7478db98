mod sql;

mod value;
pub(crate) use value::Value;

use plait_core::{
    async_trait,
    driver::{
        operation::{Column, Operation, Transaction},
        Driver, Response,
    },
    stmt, Error, Result,
};
use rusqlite::{types::Value as SqlValue, Connection as RusqliteConnection};
use std::{
    borrow::Cow,
    path::{Path, PathBuf},
    sync::Arc,
};
use url::Url;

/// Keys bound to one statement. SQLite caps bound parameters at 32766, so
/// larger batches are read in several statements of the same transaction.
const MAX_KEYS_PER_QUERY: usize = 1_000;

#[derive(Debug, Clone)]
pub struct Sqlite {
    location: Location,

    /// SQL run on every new connection, e.g. to create and seed an in-memory
    /// database
    init: Option<Arc<str>>,
}

#[derive(Debug, Clone)]
enum Location {
    File(PathBuf),
    InMemory,
}

impl Sqlite {
    /// Create a new SQLite driver with an arbitrary connection URL
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str)
            .map_err(|err| plait_core::err!("invalid connection URL `{url_str}`: {err}"))?;

        if url.scheme() != "sqlite" {
            return Err(plait_core::err!(
                "connection URL does not have a `sqlite` scheme; url={url_str}"
            ));
        }

        if url.path() == ":memory:" {
            Ok(Self::in_memory())
        } else {
            Ok(Self::open(url.path()))
        }
    }

    /// Create an in-memory SQLite database. Every connection gets its own
    /// database, so the pool keeps a single connection.
    pub fn in_memory() -> Self {
        Self {
            location: Location::InMemory,
            init: None,
        }
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self {
            location: Location::File(path.as_ref().to_path_buf()),
            init: None,
        }
    }

    /// Runs `sql` on every new connection.
    pub fn init(mut self, sql: impl Into<String>) -> Self {
        self.init = Some(sql.into().into());
        self
    }
}

#[async_trait]
impl Driver for Sqlite {
    fn url(&self) -> Cow<'_, str> {
        match &self.location {
            Location::InMemory => Cow::Borrowed("sqlite::memory:"),
            Location::File(path) => Cow::Owned(format!("sqlite:{}", path.display())),
        }
    }

    async fn connect(&self) -> Result<Box<dyn plait_core::Connection>> {
        let mut connection = match &self.location {
            Location::File(path) => Connection::open(path)?,
            Location::InMemory => Connection::in_memory()?,
        };

        if let Some(init) = &self.init {
            connection.execute_batch(init)?;
        }

        Ok(Box::new(connection))
    }

    fn max_connections(&self) -> Option<usize> {
        matches!(self.location, Location::InMemory).then_some(1)
    }
}

#[derive(Debug)]
pub struct Connection {
    connection: RusqliteConnection,
}

impl Connection {
    pub fn in_memory() -> Result<Self> {
        let connection =
            RusqliteConnection::open_in_memory().map_err(Error::storage_unavailable)?;
        Ok(Self { connection })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = RusqliteConnection::open(path).map_err(Error::storage_unavailable)?;
        Ok(Self { connection })
    }

    /// Executes a batch of `;`-separated statements.
    pub fn execute_batch(&mut self, sql: &str) -> Result<()> {
        self.connection
            .execute_batch(sql)
            .map_err(Error::storage_unavailable)
    }

    fn transaction(&mut self, op: Transaction) -> Result<()> {
        let sql = match op {
            Transaction::Start { .. } => {
                // A dropped assembly can leave its transaction open
                if !self.connection.is_autocommit() {
                    tracing::debug!("rolling back an unfinished transaction");
                    self.connection
                        .execute_batch("ROLLBACK")
                        .map_err(Error::storage_unavailable)?;
                }
                "BEGIN DEFERRED"
            }
            Transaction::Commit => "COMMIT",
            Transaction::Rollback => "ROLLBACK",
        };

        self.connection
            .execute_batch(sql)
            .map_err(Error::storage_unavailable)
    }

    fn query(
        &mut self,
        sql: &str,
        keys: &[stmt::Value],
        columns: &[Column],
        width: usize,
    ) -> Result<Vec<stmt::ValueRecord>> {
        tracing::debug!(sql, keys = keys.len(), "sqlite query");

        let mut statement = self
            .connection
            .prepare_cached(sql)
            .map_err(Error::storage_unavailable)?;

        let params = keys.iter().cloned().map(Value::from).collect::<Vec<_>>();
        let mut rows = statement
            .query(rusqlite::params_from_iter(params.iter()))
            .map_err(Error::storage_unavailable)?;

        let mut ret = vec![];

        while let Some(row) = rows.next().map_err(Error::storage_unavailable)? {
            let mut items = Vec::with_capacity(width);

            for index in 0..width {
                let value: SqlValue = row.get(index).map_err(Error::storage_unavailable)?;
                let ty = columns.get(index).map(|column| &column.ty);
                items.push(Value::from_sql(value, ty)?.into_inner());
            }

            ret.push(stmt::ValueRecord::from_vec(items));
        }

        Ok(ret)
    }
}

#[async_trait]
impl plait_core::driver::Connection for Connection {
    async fn exec(&mut self, op: Operation) -> Result<Response> {
        match op {
            Operation::Transaction(op) => {
                self.transaction(op)?;
                Ok(Response::count(0))
            }
            Operation::SelectBy(op) => {
                if op.keys.is_empty() {
                    return Ok(Response::empty_values());
                }

                let width = op.columns.len();
                let mut rows = vec![];

                for keys in op.keys.chunks(MAX_KEYS_PER_QUERY) {
                    let sql = sql::select_by(&op, keys.len());
                    rows.extend(self.query(&sql, keys, &op.columns, width)?);
                }

                Ok(Response::values(rows))
            }
            Operation::SelectThrough(op) => {
                if op.keys.is_empty() {
                    return Ok(Response::empty_values());
                }

                // The trailing source key is decoded as stored
                let width = op.columns.len() + 1;
                let mut rows = vec![];

                for keys in op.keys.chunks(MAX_KEYS_PER_QUERY) {
                    let sql = sql::select_through(&op, keys.len());
                    rows.extend(self.query(&sql, keys, &op.columns, width)?);
                }

                Ok(Response::values(rows))
            }
        }
    }
}
