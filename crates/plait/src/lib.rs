//! Assembles nested, type-checked records from relational rows.
//!
//! Composite types are registered once with a [`db::Builder`]; each call to
//! [`Db::assemble`] then reads a root row and every related row inside one
//! read snapshot and returns a fully validated [`Record`].
//!
//! ```no_run
//! # async fn run() -> plait::Result<()> {
//! use plait::schema::{FieldDef, Link, ModelDef, ScalarTy};
//! use plait::Db;
//!
//! let db = Db::builder()
//!     .register(
//!         ModelDef::new("teacher")
//!             .field(FieldDef::key("id", ScalarTy::I64))
//!             .field(FieldDef::scalar("first_name", ScalarTy::String))
//!             .field(FieldDef::scalar("last_name", ScalarTy::String)),
//!     )?
//!     .register(
//!         ModelDef::new("student")
//!             .field(FieldDef::key("id", ScalarTy::I64))
//!             .field(FieldDef::scalar("first_name", ScalarTy::String))
//!             .field(FieldDef::scalar("last_name", ScalarTy::String)),
//!     )?
//!     .register(
//!         ModelDef::new("class")
//!             .field(FieldDef::key("id", ScalarTy::I64))
//!             .field(FieldDef::scalar("subject", ScalarTy::String))
//!             .field(FieldDef::belongs_to("teacher", "teacher", "teacher_id"))
//!             .field(FieldDef::has_many_through(
//!                 "students",
//!                 "student",
//!                 Link::new("enrollment", "class_id", "student_id"),
//!             )),
//!     )?
//!     .connect("memory:")
//!     .await?;
//!
//! let class = db.assemble(1, "class").await?;
//! println!("{}", class["subject"]);
//! # Ok(())
//! # }
//! ```

pub mod db;
pub use db::Db;

mod engine;

pub use plait_core::{
    driver,
    schema::{self, Schema},
    stmt::{self, Direction, Record, RecordBuilder, Value},
    Error, Result,
};
