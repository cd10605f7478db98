//! The class / teacher / student schema shared by most tests.

use crate::Fixture;
use plait::{
    schema::{FieldDef, Link, ModelDef, ScalarTy},
    Value,
};

pub fn teacher() -> ModelDef {
    ModelDef::new("teacher")
        .field(FieldDef::key("id", ScalarTy::I64))
        .field(FieldDef::scalar("first_name", ScalarTy::String))
        .field(FieldDef::scalar("last_name", ScalarTy::String))
}

pub fn student() -> ModelDef {
    ModelDef::new("student")
        .field(FieldDef::key("id", ScalarTy::I64))
        .field(FieldDef::scalar("first_name", ScalarTy::String))
        .field(FieldDef::scalar("last_name", ScalarTy::String))
}

pub fn class() -> ModelDef {
    ModelDef::new("class")
        .field(FieldDef::key("id", ScalarTy::I64))
        .field(FieldDef::scalar("subject", ScalarTy::String))
        .field(FieldDef::belongs_to("teacher", "teacher", "teacher_id"))
        .field(FieldDef::has_many_through(
            "students",
            "student",
            Link::new("enrollment", "class_id", "student_id"),
        ))
}

pub fn models() -> Vec<ModelDef> {
    models!(teacher(), student(), class())
}

/// Class 1 has a teacher and three students. Class 2 has neither: its
/// teacher column is empty. Class 3 points at a teacher that does not exist.
pub fn fixture() -> Fixture {
    Fixture::new()
        .table(
            "teacher",
            &["id", "first_name", "last_name"],
            vec![row![1_i64, "Tommy", "Lowry"]],
        )
        .table(
            "student",
            &["id", "first_name", "last_name"],
            vec![
                row![2_i64, "Student", "One"],
                row![3_i64, "Student", "Two"],
                row![4_i64, "Student", "Three"],
            ],
        )
        .table(
            "class",
            &["id", "subject", "teacher_id"],
            vec![
                row![1_i64, "Postgres Composite Types", 1_i64],
                row![2_i64, "Independent Study", Value::Null],
                row![3_i64, "Cancelled Seminar", 99_i64],
            ],
        )
        .table(
            "enrollment",
            &["class_id", "student_id"],
            vec![row![1_i64, 2_i64], row![1_i64, 3_i64], row![1_i64, 4_i64]],
        )
}
