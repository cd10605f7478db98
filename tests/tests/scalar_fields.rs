use plait::{
    schema::{FieldDef, ModelDef, ScalarTy},
    Value,
};
use pretty_assertions::assert_eq;
use tests::{models, row, tests, DbTest, Fixture};

fn course() -> ModelDef {
    ModelDef::new("course")
        .table("courses")
        .field(FieldDef::key("code", ScalarTy::String))
        .field(FieldDef::scalar("title", ScalarTy::String).column("course_title"))
        .field(FieldDef::scalar("credits", ScalarTy::I32))
        .field(FieldDef::scalar("elective", ScalarTy::Bool))
        .field(FieldDef::scalar("notes", ScalarTy::String).nullable())
        .field(FieldDef::has_many("sections", "section", "course_code"))
}

fn section() -> ModelDef {
    ModelDef::new("section")
        .field(FieldDef::key("id", ScalarTy::I64))
        .field(FieldDef::scalar("course", ScalarTy::id("course")).column("course_code"))
        .field(
            FieldDef::scalar("moved_from", ScalarTy::id("section"))
                .column("moved_from_id")
                .nullable(),
        )
}

fn fixture() -> Fixture {
    Fixture::new()
        .table(
            "courses",
            &["code", "course_title", "credits", "elective", "notes"],
            vec![
                row!["CS101", "Intro to Computing", 4_i32, false, Value::Null],
                row!["ART220", "Printmaking", 2_i32, true, "Studio fee applies"],
            ],
        )
        .table(
            "section",
            &["id", "course_code", "moved_from_id"],
            vec![
                row![1_i64, "CS101", Value::Null],
                row![2_i64, "CS101", 1_i64],
            ],
        )
}

async fn scalars_decode_to_declared_types(test: &mut DbTest) {
    let db = test
        .setup_db(models!(section(), course()), &fixture())
        .await;

    let course = db.assemble("CS101", "course").await.unwrap();
    assert_eq!(course["code"], "CS101");
    assert_eq!(course["title"], "Intro to Computing");
    assert_eq!(course["credits"], Value::I32(4));
    assert_eq!(course["elective"], false);
    assert!(course["notes"].is_null());

    let course = db.assemble("ART220", "course").await.unwrap();
    assert_eq!(course["elective"], true);
    assert_eq!(course["notes"], "Studio fee applies");
    assert_eq!(course["sections"], Value::List(vec![]));
}

async fn identifier_references_are_not_expanded(test: &mut DbTest) {
    let db = test
        .setup_db(models!(section(), course()), &fixture())
        .await;

    let section = db.assemble(2, "section").await.unwrap();
    let course_id = db.schema().model_by_name("course").unwrap().id;

    let course = section["course"].as_id().unwrap();
    assert_eq!(course.model_id(), course_id);
    assert_eq!(course.key(), &plait::stmt::Key::String("CS101".to_string()));

    assert!(section["moved_from"].as_id().is_some());

    // A single read: nothing follows an identifier
    assert_eq!(test.log().reads(), 1);

    let section = db.assemble(1, "section").await.unwrap();
    assert!(section["moved_from"].is_null());
}

async fn non_nullable_scalar_rejects_null(test: &mut DbTest) {
    let fixture = Fixture::new().table(
        "courses",
        &["code", "course_title", "credits", "elective", "notes"],
        vec![row!["CS101", Value::Null, 4_i32, false, Value::Null]],
    );

    let db = test
        .setup_db(models!(section(), course()), &fixture)
        .await;

    let err = db.assemble("CS101", "course").await.unwrap_err();
    assert!(err.is_type_mismatch());
    assert_eq!(err.field_path(), Some("course.title"));
}

async fn identifier_reference_must_match_key_type(test: &mut DbTest) {
    // Sections are keyed by I64, so a text reference cannot name one
    let fixture = Fixture::new().table(
        "section",
        &["id", "course_code", "moved_from_id"],
        vec![row![3_i64, "CS101", "first"]],
    );

    let db = test
        .setup_db(models!(section(), course()), &fixture)
        .await;

    let err = db.assemble(3, "section").await.unwrap_err();
    assert!(err.is_type_mismatch());
    assert_eq!(err.field_path(), Some("section.moved_from"));
}

async fn key_only_type(test: &mut DbTest) {
    let tag = ModelDef::new("tag").field(FieldDef::key("name", ScalarTy::String));
    let fixture = Fixture::new().table("tag", &["name"], vec![row!["rust"]]);

    let db = test.setup_db(models!(tag), &fixture).await;

    let tag = db.assemble("rust", "tag").await.unwrap();
    assert_eq!(tag.names().collect::<Vec<_>>(), ["name"]);
    assert_eq!(tag["name"], "rust");

    let err = db.assemble("go", "tag").await.unwrap_err();
    assert!(err.is_root_not_found());
}

tests!(
    scalars_decode_to_declared_types,
    key_only_type,
    identifier_references_are_not_expanded,
    non_nullable_scalar_rejects_null,
    identifier_reference_must_match_key_type,
);
