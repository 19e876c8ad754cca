use grist_core::{
    schema::{DefaultFlags, Field, FieldRef, Model, Schema, Type},
    stmt::{Literal, Op, OrderEntry, Query, Value},
    Record,
};
use grist_sql::{Options, Serializer};
use pretty_assertions::assert_eq;

fn schema() -> Schema {
    let mut schema = Schema::new();
    schema
        .register(
            Model::new("User")
                .field(Field::new("id", Type::Integer(8)).primary_key().auto_increment())
                .field(Field::new("name", Type::Text).not_null())
                .field(Field::new("age", Type::Integer(4)))
                .field(Field::new("active", Type::Boolean)),
        )
        .unwrap();
    schema
        .register(
            Model::new("Post")
                .field(Field::new("id", Type::Integer(8)).primary_key().auto_increment())
                .field(Field::new("title", Type::Text).not_null())
                .field(Field::new("status", Type::Text).default_value("draft"))
                .field(
                    Field::new("slug", Type::Text).default_fn(DefaultFlags::ON_INSERT, |cx| {
                        let title = cx
                            .record
                            .and_then(|record| record.get("title"))
                            .and_then(Value::as_str)
                            .unwrap_or_default();
                        Value::from(title.to_lowercase().replace(' ', "-"))
                    }),
                )
                .field(
                    Field::new("createdAt", Type::DateTime)
                        .default_literal(Literal::raw("CURRENT_TIMESTAMP")),
                )
                .field(
                    Field::new("updatedAt", Type::DateTime)
                        .default_fn(DefaultFlags::ON_UPDATE.literal(), |_| Value::from("now()")),
                ),
        )
        .unwrap();
    schema
}

#[test]
fn bulk_insert_aligns_columns() {
    let schema = schema();
    let records = [
        Record::new("User").with("name", "Bob").with("age", 30),
        Record::new("User").with("name", "Sue"),
    ];

    assert_eq!(
        Serializer::postgresql(&schema)
            .generate_insert_statement("User", &records, &Options::new())
            .unwrap()
            .unwrap(),
        r#"INSERT INTO "users" ("name", "age") VALUES ('Bob', 30), ('Sue', DEFAULT)"#
    );

    assert_eq!(
        Serializer::sqlite(&schema)
            .generate_insert_statement("User", &records, &Options::new())
            .unwrap()
            .unwrap(),
        r#"INSERT INTO "users" ("name", "age") VALUES ('Bob', 30), ('Sue', NULL)"#
    );
}

#[test]
fn insert_values_are_coerced_to_the_column_type() {
    let schema = schema();
    let records = [Record::new("User")
        .with("name", "Bob")
        .with("age", "41")
        .with("active", true)];

    assert_eq!(
        Serializer::sqlite(&schema)
            .generate_insert_statement("User", &records, &Options::new())
            .unwrap()
            .unwrap(),
        r#"INSERT INTO "users" ("name", "age", "active") VALUES ('Bob', 41, 1)"#
    );
    assert_eq!(
        Serializer::mysql(&schema)
            .generate_insert_statement("User", &records, &Options::new())
            .unwrap()
            .unwrap(),
        "INSERT INTO `users` (`name`, `age`, `active`) VALUES ('Bob', 41, TRUE)"
    );
}

#[test]
fn insert_fills_defaults_of_unset_fields() {
    let schema = schema();
    let records = [Record::new("Post").with("title", "Hello World")];

    assert_eq!(
        Serializer::postgresql(&schema)
            .generate_insert_statement("Post", &records, &Options::new())
            .unwrap()
            .unwrap(),
        r#"INSERT INTO "posts" ("title", "status", "slug", "created_at", "updated_at") VALUES ('Hello World', 'draft', 'hello-world', CURRENT_TIMESTAMP, now())"#
    );
}

#[test]
fn insert_keeps_assigned_values_over_defaults() {
    let schema = schema();
    let records = [Record::new("Post")
        .with("title", "Hello")
        .with("status", "published")
        .with("slug", "custom")];

    assert_eq!(
        Serializer::postgresql(&schema)
            .generate_insert_statement("Post", &records, &Options::new())
            .unwrap()
            .unwrap(),
        r#"INSERT INTO "posts" ("title", "status", "slug", "created_at", "updated_at") VALUES ('Hello', 'published', 'custom', CURRENT_TIMESTAMP, now())"#
    );
}

#[test]
fn insert_returning() {
    let schema = schema();
    let records = [Record::new("User").with("name", "Bob")];
    let opts = Options::new().with_returning(["id"]);

    assert_eq!(
        Serializer::postgresql(&schema)
            .generate_insert_statement("User", &records, &opts)
            .unwrap()
            .unwrap(),
        r#"INSERT INTO "users" ("name") VALUES ('Bob') RETURNING "id""#
    );

    let err = Serializer::mysql(&schema)
        .generate_insert_statement("User", &records, &opts)
        .unwrap_err();
    assert!(err.is_unsupported_feature());
}

#[test]
fn insert_without_values_yields_nothing() {
    let schema = schema();

    let sql = Serializer::postgresql(&schema)
        .generate_insert_statement("User", &[Record::new("User")], &Options::new())
        .unwrap();
    assert_eq!(sql, None);

    let sql = Serializer::postgresql(&schema)
        .generate_insert_statement("User", &[], &Options::new())
        .unwrap();
    assert_eq!(sql, None);
}

#[test]
fn insert_rejects_records_of_another_model() {
    let schema = schema();

    let err = Serializer::postgresql(&schema)
        .generate_insert_statement(
            "User",
            &[Record::new("Post").with("title", "Hello")],
            &Options::new(),
        )
        .unwrap_err();
    assert!(err.is_invalid_statement());
}

#[test]
fn update_sets_dirty_fields() {
    let schema = schema();
    let mut record = Record::loaded(
        "User",
        [
            ("id", Value::I64(1)),
            ("name", "Bob".into()),
            ("age", Value::I64(30)),
        ],
    );
    record.set("age", 31);
    record.set("name", "Bob");

    let query = Query::new("User").and("id", Op::Eq, 1);

    assert_eq!(
        Serializer::postgresql(&schema)
            .generate_update_statement("User", &record, Some(&query), &Options::new())
            .unwrap()
            .unwrap(),
        r#"UPDATE "users" SET "age" = 31 WHERE "users"."id" = 1"#
    );
}

#[test]
fn update_applies_on_update_defaults() {
    let schema = schema();
    let mut record = Record::loaded("Post", [("id", Value::I64(1)), ("title", "Old".into())]);
    record.set("title", "New");

    let query = Query::new("Post").and("id", Op::Eq, 1);

    assert_eq!(
        Serializer::postgresql(&schema)
            .generate_update_statement("Post", &record, Some(&query), &Options::new())
            .unwrap()
            .unwrap(),
        r#"UPDATE "posts" SET "title" = 'New', "updated_at" = now() WHERE "posts"."id" = 1"#
    );
}

#[test]
fn update_without_changes_yields_nothing() {
    let schema = schema();
    let record = Record::loaded("User", [("id", Value::I64(1))]);

    let sql = Serializer::postgresql(&schema)
        .generate_update_statement("User", &record, None, &Options::new())
        .unwrap();
    assert_eq!(sql, None);
}

#[test]
fn update_order_and_limit_follow_the_dialect() {
    let schema = schema();
    let mut record = Record::loaded("User", [("id", Value::I64(1)), ("age", Value::I64(30))]);
    record.set("age", 31);

    let query = Query::new("User")
        .and("name", Op::Eq, "Bob")
        .order_by([OrderEntry::asc(FieldRef::new("User", "id"))])
        .limit(1);

    assert_eq!(
        Serializer::mysql(&schema)
            .generate_update_statement("User", &record, Some(&query), &Options::new())
            .unwrap()
            .unwrap(),
        "UPDATE `users` SET `age` = 31 WHERE `users`.`name` = 'Bob' ORDER BY `users`.`id` ASC LIMIT 1"
    );
    assert_eq!(
        Serializer::postgresql(&schema)
            .generate_update_statement("User", &record, Some(&query), &Options::new())
            .unwrap()
            .unwrap(),
        r#"UPDATE "users" SET "age" = 31 WHERE "users"."name" = 'Bob'"#
    );
}

#[test]
fn update_returning() {
    let schema = schema();
    let record = Record::new("User").with("active", false);

    assert_eq!(
        Serializer::sqlite(&schema)
            .generate_update_statement(
                "User",
                &record,
                None,
                &Options::new().with_returning(["id", "name"])
            )
            .unwrap()
            .unwrap(),
        r#"UPDATE "users" SET "active" = 0 RETURNING "id", "name""#
    );
}

#[test]
fn update_through_joins_is_unsupported() {
    let schema = schema();
    let record = Record::new("User").with("age", 1);
    let query = Query::new("User").and("id", Op::Eq, Query::new("Post").target("id"));

    let err = Serializer::postgresql(&schema)
        .generate_update_statement("User", &record, Some(&query), &Options::new())
        .unwrap_err();
    assert!(err.is_unsupported_feature());
}

#[test]
fn unknown_fields_are_rejected() {
    let schema = schema();
    let serializer = Serializer::postgresql(&schema);

    let err = serializer
        .generate_insert_statement(
            "User",
            &[Record::new("User").with("name", "Bob").with("nmae", "Bob")],
            &Options::new(),
        )
        .unwrap_err();
    assert!(err.is_invalid_statement());
    assert_eq!(
        err.to_string(),
        "invalid statement: model `User` has no field `nmae`"
    );

    let mut record = Record::loaded("User", [("id", Value::I64(1))]);
    record.set("email", "bob@example.com");

    let err = serializer
        .generate_update_statement("User", &record, None, &Options::new())
        .unwrap_err();
    assert!(err.is_invalid_statement());
}

#[test]
fn mysql_update_rejects_an_offset() {
    let schema = schema();
    let mut record = Record::loaded("User", [("id", Value::I64(1)), ("age", Value::I64(30))]);
    record.set("age", 31);

    let query = Query::new("User").and("name", Op::Eq, "Bob").limit(1).offset(2);

    let err = Serializer::mysql(&schema)
        .generate_update_statement("User", &record, Some(&query), &Options::new())
        .unwrap_err();
    assert!(err.is_unsupported_feature());
    assert_eq!(
        err.to_string(),
        "unsupported feature: MySQL does not support OFFSET in UPDATE statements"
    );
}
