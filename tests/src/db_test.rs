use crate::{
    logging_driver::{DriverOp, LoggingDriver},
    ExecLog, Fixture, Setup,
};
use plait::{schema::ModelDef, Db};
use std::{
    future::Future,
    pin::Pin,
    sync::{Arc, Mutex},
};

/// Runs one test against one storage backend.
///
/// Owns the Tokio runtime so tests can use plain `#[test]`, and always wraps
/// the driver in a [`LoggingDriver`] so tests can assert on the reads an
/// assembly issued.
pub struct DbTest {
    runtime: Option<tokio::runtime::Runtime>,
    setup: Box<dyn Setup>,
    ops_log: Arc<Mutex<Vec<DriverOp>>>,
}

impl DbTest {
    /// Create a new DbTest with a current-thread runtime.
    pub fn new(setup: Box<dyn Setup>) -> Self {
        crate::init_tracing();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to create Tokio runtime");

        Self {
            runtime: Some(runtime),
            setup,
            ops_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Registers `models` and connects to storage seeded with `fixture`.
    pub async fn try_setup_db(
        &mut self,
        models: Vec<ModelDef>,
        fixture: &Fixture,
    ) -> plait::Result<Db> {
        let mut builder = Db::builder();

        for model in models {
            builder.register(model)?;
        }

        let driver = self.setup.driver(fixture).await?;

        let logging_driver = LoggingDriver::new(driver);
        self.ops_log = logging_driver.ops_log_handle();

        let db = builder.build(logging_driver).await?;

        // Opening the pool is not part of what tests assert on
        self.log().clear();
        Ok(db)
    }

    pub async fn setup_db(&mut self, models: Vec<ModelDef>, fixture: &Fixture) -> Db {
        self.try_setup_db(models, fixture).await.unwrap()
    }

    /// Get the operations log for assertions
    pub fn log(&self) -> ExecLog {
        ExecLog::new(self.ops_log.clone())
    }

    pub fn backend(&self) -> &'static str {
        self.setup.name()
    }

    /// Run a test function with a mutable reference to self, using our managed runtime.
    pub fn run_test<F>(&mut self, test_fn: F)
    where
        F: for<'a> FnOnce(&'a mut DbTest) -> Pin<Box<dyn Future<Output = ()> + 'a>>,
    {
        let runtime = self.runtime.take().expect("test already running");
        runtime.block_on(test_fn(self));
        self.runtime = Some(runtime);
    }
}
