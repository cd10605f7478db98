mod store;
pub use store::{Row, Store};

use plait_core::{
    async_trait,
    driver::{
        operation::{Operation, SelectBy, SelectThrough, Transaction},
        Connection, Driver, Response,
    },
    stmt::{Key, Value, ValueRecord},
    Error, Result,
};

use std::{
    borrow::Cow,
    collections::{HashMap, HashSet},
    io,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, PoisonError, RwLock,
    },
};

/// An in-memory, multi-versioned row store.
///
/// Writers publish a new immutable [`Store`] version; a connection that
/// starts a transaction keeps reading the version that was current at
/// `Start` until it commits or rolls back. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct Memory {
    shared: Arc<Shared>,
}

#[derive(Debug, Default)]
struct Shared {
    current: RwLock<Arc<Store>>,

    /// When set, every read fails with `StorageUnavailable`
    fail_reads: AtomicBool,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row to `table`, creating the table on first use. Returns the
    /// new version.
    pub fn insert<I, K, V>(&self, table: &str, row: I) -> u64
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let row: Row = row
            .into_iter()
            .map(|(column, value)| (column.into(), value.into()))
            .collect();

        self.write(|data| data.table_mut(table).push(row))
    }

    /// Removes every row of `table` whose `column` equals `value`. Returns
    /// the number of rows removed.
    pub fn delete_where(&self, table: &str, column: &str, value: impl Into<Value>) -> usize {
        let Some(key) = Key::from_value(&value.into()) else {
            return 0;
        };

        let mut removed = 0;
        self.write(|data| {
            let rows = data.table_mut(table);
            let before = rows.len();
            rows.retain(|row| store::key_of(row, column).as_ref() != Some(&key));
            removed = before - rows.len();
        });
        removed
    }

    /// Sets `set_column` to `set_value` on every row of `table` whose
    /// `column` equals `value`. Returns the number of rows changed.
    pub fn update_where(
        &self,
        table: &str,
        column: &str,
        value: impl Into<Value>,
        set_column: &str,
        set_value: impl Into<Value>,
    ) -> usize {
        let Some(key) = Key::from_value(&value.into()) else {
            return 0;
        };
        let set_value = set_value.into();

        let mut changed = 0;
        self.write(|data| {
            for row in data.table_mut(table).iter_mut() {
                if store::key_of(row, column).as_ref() == Some(&key) {
                    row.insert(set_column.to_string(), set_value.clone());
                    changed += 1;
                }
            }
        });
        changed
    }

    /// Makes every subsequent read fail (or succeed again) on all
    /// connections.
    pub fn fail_reads(&self, fail: bool) {
        self.shared.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Version of the latest published store.
    pub fn version(&self) -> u64 {
        self.snapshot().version
    }

    /// The latest published store.
    pub fn snapshot(&self) -> Arc<Store> {
        self.shared
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn write(&self, f: impl FnOnce(&mut Store)) -> u64 {
        let mut current = self
            .shared
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        // Readers holding the old version keep it untouched
        let store = Arc::make_mut(&mut *current);
        f(store);
        store.version += 1;

        tracing::trace!(version = store.version, "published store version");
        store.version
    }
}

#[async_trait]
impl Driver for Memory {
    fn url(&self) -> Cow<'_, str> {
        Cow::Borrowed("memory:")
    }

    async fn connect(&self) -> Result<Box<dyn Connection>> {
        Ok(Box::new(MemoryConnection {
            shared: self.shared.clone(),
            snapshot: None,
        }))
    }
}

#[derive(Debug)]
pub struct MemoryConnection {
    shared: Arc<Shared>,

    /// Version pinned by an open transaction
    snapshot: Option<Arc<Store>>,
}

impl MemoryConnection {
    fn store(&self) -> Result<Arc<Store>> {
        if self.shared.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::storage_unavailable(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "memory store is not serving reads",
            )));
        }

        Ok(match &self.snapshot {
            Some(store) => store.clone(),
            None => self
                .shared
                .current
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        })
    }

    fn select_by(&self, op: SelectBy) -> Result<Vec<ValueRecord>> {
        let store = self.store()?;
        let keys: HashSet<Key> = op.keys.iter().filter_map(Key::from_value).collect();

        Ok(store
            .rows(&op.table)
            .iter()
            .filter(|row| {
                store::key_of(row, &op.filter_column).is_some_and(|key| keys.contains(&key))
            })
            .map(|row| store::project(row, op.columns.iter().map(|column| &column.name[..])))
            .collect())
    }

    fn select_through(&self, op: SelectThrough) -> Result<Vec<ValueRecord>> {
        let store = self.store()?;
        let keys: HashSet<Key> = op.keys.iter().filter_map(Key::from_value).collect();

        let mut targets: HashMap<Key, Vec<&Row>> = HashMap::new();
        for row in store.rows(&op.table) {
            if let Some(key) = store::key_of(row, &op.key_column) {
                targets.entry(key).or_default().push(row);
            }
        }

        let mut rows = vec![];

        for link in store.rows(&op.link.table) {
            let Some(source) = store::key_of(link, &op.link.source_column) else {
                continue;
            };
            if !keys.contains(&source) {
                continue;
            }

            let Some(target) = store::key_of(link, &op.link.target_column) else {
                continue;
            };

            for row in targets.get(&target).into_iter().flatten() {
                let mut record =
                    store::project(row, op.columns.iter().map(|column| &column.name[..]));
                record
                    .fields
                    .push(store::value_of(link, &op.link.source_column));
                rows.push(record);
            }
        }

        Ok(rows)
    }
}

#[async_trait]
impl Connection for MemoryConnection {
    async fn exec(&mut self, op: Operation) -> Result<Response> {
        tracing::debug!(?op, "memory exec");

        match op {
            Operation::Transaction(Transaction::Start { .. }) => {
                let store = self
                    .shared
                    .current
                    .read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .clone();

                if self.snapshot.replace(store).is_some() {
                    tracing::debug!("replacing snapshot of an unfinished transaction");
                }
                Ok(Response::count(0))
            }
            Operation::Transaction(Transaction::Commit | Transaction::Rollback) => {
                self.snapshot = None;
                Ok(Response::count(0))
            }
            Operation::SelectBy(op) => Ok(Response::values(self.select_by(op)?)),
            Operation::SelectThrough(op) => Ok(Response::values(self.select_through(op)?)),
        }
    }
}
