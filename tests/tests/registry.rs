use plait::{
    schema::{FieldDef, Link, ModelDef, ScalarTy},
    Db,
};
use pretty_assertions::assert_eq;
use tests::classroom;

#[test]
fn duplicate_type_is_rejected() {
    let mut builder = Db::builder();
    builder.register(classroom::teacher()).unwrap();

    let err = builder.register(classroom::teacher()).unwrap_err();
    assert!(err.is_duplicate_type());
}

#[test]
fn cycle_is_rejected_at_registration() {
    let mut builder = Db::builder();
    builder
        .register(classroom::teacher())
        .unwrap()
        .register(classroom::class())
        .unwrap();

    // A student nesting its class would nest itself through `class.students`
    let student = classroom::student().field(FieldDef::belongs_to("class", "class", "class_id"));
    let err = builder.register(student).unwrap_err();
    assert!(err.is_cyclic_type());
    assert_eq!(err.to_string(), "cyclic type: student -> class -> student");

    // The rejected declaration left no trace
    builder.register(classroom::student()).unwrap();
    builder.build_schema().unwrap();
}

#[test]
fn unknown_target_is_reported_when_built() {
    let mut builder = Db::builder();
    builder.register(classroom::class()).unwrap();

    let err = builder.build_schema().unwrap_err();
    assert!(err.is_unknown_type());
}

#[test]
fn link_names_must_not_be_empty() {
    let mut builder = Db::builder();
    builder
        .register(classroom::student())
        .unwrap()
        .register(
            ModelDef::new("club")
                .field(FieldDef::key("id", ScalarTy::I64))
                .field(FieldDef::has_many_through(
                    "members",
                    "student",
                    Link::new("membership", "", "student_id"),
                )),
        )
        .unwrap();

    let err = builder.build_schema().unwrap_err();
    assert!(err.is_invalid_schema());
    assert_eq!(
        err.to_string(),
        "invalid schema: field `club.members` maps to an empty storage name"
    );
}

#[test]
fn key_must_be_a_plain_scalar() {
    let mut builder = Db::builder();
    builder
        .register(classroom::class())
        .unwrap()
        .register(classroom::teacher())
        .unwrap()
        .register(classroom::student())
        .unwrap()
        .register(
            ModelDef::new("seat").field(FieldDef::key("class", ScalarTy::id("class"))),
        )
        .unwrap();

    let err = builder.build_schema().unwrap_err();
    assert!(err.is_invalid_schema());
}

#[test]
fn schema_is_shared_by_clones() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    runtime.block_on(async {
        let mut builder = Db::builder();
        for model in classroom::models() {
            builder.register(model).unwrap();
        }
        let db = builder.connect("memory:").await.unwrap();
        let clone = db.clone();

        assert!(std::sync::Arc::ptr_eq(db.schema(), clone.schema()));
        assert_eq!(db.pool().url(), "memory:");

        let names: Vec<_> = db.schema().models().map(|model| &model.name[..]).collect();
        assert_eq!(names, ["teacher", "student", "class"]);
    });
}

#[tokio::test]
async fn unsupported_url_scheme() {
    let err = Db::builder()
        .connect("postgresql://localhost/classes")
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "unsupported storage; scheme=postgresql; url=postgresql://localhost/classes"
    );
}

#[tokio::test]
async fn zero_connections_is_rejected() {
    let mut builder = Db::builder();
    for model in classroom::models() {
        builder.register(model).unwrap();
    }

    let built = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        builder.max_connections(0).connect("memory:"),
    )
    .await
    .expect("building a zero-sized pool must not wait for a connection");

    let err = built.unwrap_err();
    assert!(err.is_invalid_configuration());
    assert_eq!(
        err.to_string(),
        "invalid configuration: pool for `memory:` must allow at least one connection"
    );
}
