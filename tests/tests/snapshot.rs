#![cfg(feature = "memory")]

//! Behavior that needs control over the memory store while an assembly is
//! in flight.

use plait::{
    driver::{operation::Transaction, Connection, Driver, Operation, Response},
    Db, Value,
};
use plait_core::{async_trait, Result};
use plait_driver_memory::Memory;
use pretty_assertions::assert_eq;
use std::{
    borrow::Cow,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};
use tests::{classroom, db::memory::SetupMemory, ExecLog, LoggingDriver};

/// What happens to the store right after the first read of an assembly.
#[derive(Debug, Clone, Copy)]
enum Interleave {
    /// Rename the teacher and drop a student from class 1
    Write,

    /// Stop serving reads
    Fail,
}

/// Wraps a memory store and runs one [`Interleave`] action between the
/// first and second read of the first assembly.
#[derive(Debug)]
struct InterleavingDriver {
    memory: Memory,
    action: Interleave,
    fired: Arc<AtomicBool>,
}

#[derive(Debug)]
struct InterleavingConnection {
    inner: Box<dyn Connection>,
    memory: Memory,
    action: Interleave,
    fired: Arc<AtomicBool>,
}

#[async_trait]
impl Driver for InterleavingDriver {
    fn url(&self) -> Cow<'_, str> {
        self.memory.url()
    }

    async fn connect(&self) -> Result<Box<dyn Connection>> {
        Ok(Box::new(InterleavingConnection {
            inner: self.memory.connect().await?,
            memory: self.memory.clone(),
            action: self.action,
            fired: self.fired.clone(),
        }))
    }
}

#[async_trait]
impl Connection for InterleavingConnection {
    async fn exec(&mut self, op: Operation) -> Result<Response> {
        let is_read = op.is_read();
        let response = self.inner.exec(op).await?;

        if is_read && !self.fired.swap(true, Ordering::SeqCst) {
            match self.action {
                Interleave::Write => {
                    self.memory
                        .update_where("teacher", "id", 1_i64, "first_name", "Thomas");
                    self.memory.delete_where("enrollment", "student_id", 4_i64);
                }
                Interleave::Fail => self.memory.fail_reads(true),
            }
        }

        Ok(response)
    }
}

async fn setup(action: Interleave) -> (Db, Memory, ExecLog) {
    tests::init_tracing();

    let memory = SetupMemory::load(&classroom::fixture());
    let driver = LoggingDriver::new(Box::new(InterleavingDriver {
        memory: memory.clone(),
        action,
        fired: Arc::new(AtomicBool::new(false)),
    }));
    let log = driver.exec_log();

    let mut builder = Db::builder();
    for model in classroom::models() {
        builder.register(model).unwrap();
    }
    let db = builder.build(driver).await.unwrap();
    log.clear();

    (db, memory, log)
}

fn student_ids(class: &plait::Record) -> Vec<i64> {
    let mut ids: Vec<_> = class["students"]
        .expect_list()
        .iter()
        .map(|student| student.expect_record()["id"].as_i64().unwrap())
        .collect();
    ids.sort();
    ids
}

#[tokio::test]
async fn concurrent_write_is_not_observed() {
    let (db, memory, _log) = setup(Interleave::Write).await;
    let before = memory.version();

    let class = db.assemble(1, "class").await.unwrap();

    // The write landed while the assembly was reading
    assert!(memory.version() > before);

    assert_eq!(class["teacher"].expect_record()["first_name"], "Tommy");
    assert_eq!(student_ids(&class), [2, 3, 4]);

    let class = db.assemble(1, "class").await.unwrap();
    assert_eq!(class["teacher"].expect_record()["first_name"], "Thomas");
    assert_eq!(student_ids(&class), [2, 3]);
}

#[tokio::test]
async fn storage_failure_names_the_field() {
    let (db, memory, log) = setup(Interleave::Fail).await;

    let err = db.assemble(1, "class").await.unwrap_err();
    assert!(err.is_storage_unavailable());
    assert_eq!(err.field_path(), Some("class.teacher"));
    assert_eq!(
        err.to_string(),
        "resolving field `class.teacher`: \
         storage unavailable: memory store is not serving reads"
    );

    // No partial record, and the snapshot was released
    assert_eq!(
        log.transactions(),
        [
            Transaction::Start { read_only: true },
            Transaction::Rollback
        ]
    );

    memory.fail_reads(false);
    let class = db.assemble(1, "class").await.unwrap();
    assert_eq!(class["subject"], "Postgres Composite Types");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_assemblies_agree() {
    tests::init_tracing();

    let memory = SetupMemory::load(&classroom::fixture());
    let mut builder = Db::builder();
    for model in classroom::models() {
        builder.register(model).unwrap();
    }
    let db = builder.max_connections(4).build(memory).await.unwrap();

    let expected = db.assemble(1, "class").await.unwrap();

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..32 {
        let db = db.clone();
        tasks.spawn(async move {
            let root = if i % 2 == 0 { 1 } else { 2 };
            (root, db.assemble(root, "class").await.unwrap())
        });
    }

    while let Some(res) = tasks.join_next().await {
        let (root, class) = res.unwrap();
        if root == 1 {
            assert_eq!(class, expected);
        } else {
            assert_eq!(class["students"], Value::List(vec![]));
        }
    }

    assert_eq!(db.pool().max_size(), 4);
}
