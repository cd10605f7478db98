use plait::schema::{FieldDef, ModelDef, ScalarTy};
use pretty_assertions::assert_eq;
use tests::{classroom, models, row, tests, DbTest, Fixture};

fn school() -> ModelDef {
    ModelDef::new("school")
        .field(FieldDef::key("id", ScalarTy::I64))
        .field(FieldDef::scalar("name", ScalarTy::String))
        .field(FieldDef::has_many("classes", "class", "school_id"))
}

/// Three schools, five classes, one shared teacher and a handful of
/// students.
fn fixture() -> Fixture {
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
            "school",
            &["id", "name"],
            vec![row![10_i64, "North"], row![20_i64, "South"], row![30_i64, "Closed"]],
        )
        .table(
            "class",
            &["id", "subject", "teacher_id", "school_id"],
            vec![
                row![1_i64, "Algebra", 1_i64, 10_i64],
                row![2_i64, "Geometry", 1_i64, 10_i64],
                row![3_i64, "Biology", 1_i64, 10_i64],
                row![4_i64, "Chemistry", 1_i64, 20_i64],
                row![5_i64, "Physics", 1_i64, 20_i64],
            ],
        )
        .table(
            "enrollment",
            &["class_id", "student_id"],
            vec![
                row![1_i64, 2_i64],
                row![2_i64, 2_i64],
                row![2_i64, 3_i64],
                row![4_i64, 4_i64],
            ],
        )
}

async fn one_read_per_relation_level(test: &mut DbTest) {
    let db = test
        .setup_db(
            models!(
                classroom::teacher(),
                classroom::student(),
                classroom::class(),
                school()
            ),
            &fixture(),
        )
        .await;

    let school = db.assemble(10, "school").await.unwrap();
    let classes = school["classes"].expect_list();
    assert_eq!(classes.len(), 3);

    // school, classes, teachers of all classes, students of all classes
    let log = test.log();
    assert_eq!(log.reads(), 4);
    assert_eq!(log.tables(), ["school", "class", "teacher", "student"]);

    // The shared teacher is read once, not once per class
    assert_eq!(log.row_counts(), [1, 3, 1, 3]);
}

async fn read_count_does_not_grow_with_roots(test: &mut DbTest) {
    let db = test
        .setup_db(
            models!(
                classroom::teacher(),
                classroom::student(),
                classroom::class(),
                school()
            ),
            &fixture(),
        )
        .await;

    let schools = db.assemble_many([10, 20], "school").await.unwrap();
    assert_eq!(schools.len(), 2);
    assert_eq!(schools[1]["classes"].expect_list().len(), 2);
    assert_eq!(test.log().reads(), 4);
}

async fn empty_level_skips_reads(test: &mut DbTest) {
    let db = test
        .setup_db(
            models!(
                classroom::teacher(),
                classroom::student(),
                classroom::class(),
                school()
            ),
            &fixture(),
        )
        .await;

    // No classes, so neither teachers nor students are read
    let school = db.assemble(30, "school").await.unwrap();
    assert_eq!(school["classes"].expect_list().len(), 0);
    assert_eq!(test.log().tables(), ["school", "class"]);
}

async fn empty_foreign_key_skips_read(test: &mut DbTest) {
    let db = test
        .setup_db(classroom::models(), &classroom::fixture())
        .await;

    db.assemble(2, "class").await.unwrap();

    // The teacher column is empty, so there is nothing to look up
    assert_eq!(test.log().tables(), ["class", "student"]);
}

tests!(
    one_read_per_relation_level,
    read_count_does_not_grow_with_roots,
    empty_level_skips_reads,
    empty_foreign_key_skips_read,
);
