use plait::Value;
use pretty_assertions::assert_eq;
use tests::{classroom, tests, DbTest};

async fn resolve_scalar(test: &mut DbTest) {
    let db = test
        .setup_db(classroom::models(), &classroom::fixture())
        .await;

    let subject = db.resolve_scalar(1, "class", "subject").await.unwrap();
    assert_eq!(subject, "Postgres Composite Types");

    // Only the root row is read
    assert_eq!(test.log().tables(), ["class"]);
}

async fn resolve_single_relation(test: &mut DbTest) {
    let db = test
        .setup_db(classroom::models(), &classroom::fixture())
        .await;

    let teacher = db
        .resolve_single_relation(1, "class", "teacher")
        .await
        .unwrap();
    assert_eq!(teacher.expect_record()["first_name"], "Tommy");

    let teacher = db
        .resolve_single_relation(2, "class", "teacher")
        .await
        .unwrap();
    assert_eq!(teacher, Value::Absent);
}

async fn resolve_collection(test: &mut DbTest) {
    let db = test
        .setup_db(classroom::models(), &classroom::fixture())
        .await;

    let students = db.resolve_collection(1, "class", "students").await.unwrap();
    let mut ids: Vec<_> = students
        .iter()
        .map(|student| student["id"].as_i64().unwrap())
        .collect();
    ids.sort();
    assert_eq!(ids, [2, 3, 4]);

    // The teacher relation is not touched
    assert_eq!(test.log().tables(), ["class", "student"]);

    let students = db.resolve_collection(2, "class", "students").await.unwrap();
    assert!(students.is_empty());
}

async fn resolve_checks_field_kind(test: &mut DbTest) {
    let db = test
        .setup_db(classroom::models(), &classroom::fixture())
        .await;

    let err = db.resolve_scalar(1, "class", "teacher").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "field `class.teacher` is SingleRelation, not Scalar"
    );

    let err = db
        .resolve_collection(1, "class", "subject")
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "field `class.subject` is Scalar, not CollectionRelation"
    );

    assert!(test.log().is_empty());
}

async fn resolve_unknown_field(test: &mut DbTest) {
    let db = test
        .setup_db(classroom::models(), &classroom::fixture())
        .await;

    let err = db.resolve_scalar(1, "class", "room").await.unwrap_err();
    assert!(err.is_unknown_field());
}

async fn resolve_missing_root(test: &mut DbTest) {
    let db = test
        .setup_db(classroom::models(), &classroom::fixture())
        .await;

    let err = db
        .resolve_single_relation(999, "class", "teacher")
        .await
        .unwrap_err();
    assert!(err.is_root_not_found());
}

tests!(
    resolve_scalar,
    resolve_single_relation,
    resolve_collection,
    resolve_checks_field_kind,
    resolve_unknown_field,
    resolve_missing_root,
);
