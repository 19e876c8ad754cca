use grist_core::{
    schema::{Field, FieldRef, Model, Schema, Type},
    stmt::{Literal, Op, Query, Value},
};
use grist_sql::{Options, Serializer};
use pretty_assertions::assert_eq;

fn schema() -> Schema {
    let mut schema = Schema::new();
    schema
        .register(
            Model::new("User")
                .field(Field::new("id", Type::Integer(8)).primary_key())
                .field(Field::new("name", Type::Text).unique().not_null())
                .field(Field::new("age", Type::Integer(4))),
        )
        .unwrap();
    schema
        .register(
            Model::new("Role")
                .field(Field::new("id", Type::Integer(8)).primary_key())
                .field(Field::new("userID", Type::Integer(8)).not_null())
                .field(Field::new("name", Type::Text)),
        )
        .unwrap();
    schema
}

/// Renders `query` without projection aliases and returns the WHERE clause.
fn where_clause(schema: &Schema, query: Query) -> String {
    let sql = Serializer::postgresql(schema)
        .generate_select_query(&query, &Options::new().without_projection_aliases())
        .unwrap()
        .sql;

    match sql.split_once(" WHERE ") {
        Some((_, filter)) => filter.to_string(),
        None => String::new(),
    }
}

#[test]
fn comparison_and_in_list() {
    let schema = schema();
    let query = Query::new("User")
        .and("age", Op::Gte, 18)
        .and("name", Op::Eq, vec!["Bob", "Sue"]);

    let sql = Serializer::postgresql(&schema)
        .generate_select_query(&query, &Options::new().without_projection_aliases())
        .unwrap()
        .sql;

    assert_eq!(
        sql,
        r#"SELECT "users"."id", "users"."name", "users"."age" FROM "users" WHERE "users"."age" >= 18 AND "users"."name" IN ('Bob','Sue')"#
    );
}

#[test]
fn null_compares_with_is() {
    let schema = schema();

    assert_eq!(
        where_clause(&schema, Query::new("User").and("age", Op::Eq, Value::Null)),
        r#""users"."age" IS NULL"#
    );
    assert_eq!(
        where_clause(&schema, Query::new("User").and("age", Op::Neq, Value::Null)),
        r#""users"."age" IS NOT NULL"#
    );

    let err = Serializer::postgresql(&schema)
        .generate_select_query(
            &Query::new("User").and("age", Op::Gt, Value::Null),
            &Options::new(),
        )
        .unwrap_err();
    assert!(err.is_invalid_operator());
}

#[test]
fn list_with_null_splits_into_is_and_in() {
    let schema = schema();

    assert_eq!(
        where_clause(
            &schema,
            Query::new("User").and("age", Op::Eq, vec![Value::Null, 1.into(), 2.into()])
        ),
        r#"("users"."age" IS NULL OR "users"."age" IN (1,2))"#
    );

    assert_eq!(
        where_clause(
            &schema,
            Query::new("User").and_not("age", Op::Eq, vec![Value::Null, 1.into()])
        ),
        r#"("users"."age" IS NOT NULL AND "users"."age" NOT IN (1))"#
    );
}

#[test]
fn list_entries_are_coerced_and_deduplicated() {
    let schema = schema();
    let values: Vec<Value> = vec![3.into(), "3".into(), "three".into(), 4.into()];

    assert_eq!(
        where_clause(&schema, Query::new("User").and("age", Op::Eq, values)),
        r#""users"."age" IN (3,4)"#
    );
}

#[test]
fn ordering_operator_on_list_is_rejected() {
    let schema = schema();
    let query = Query::new("User").and("age", Op::Gt, vec![1, 2]);

    let err = Serializer::postgresql(&schema)
        .generate_select_query(&query, &Options::new())
        .unwrap_err();

    assert!(err.is_invalid_operator());
    assert_eq!(
        err.to_string(),
        "invalid operator GT on User:age: cannot be applied to a list"
    );
}

#[test]
fn empty_list_is_rejected_by_default() {
    let schema = schema();
    let query = Query::new("User").and("name", Op::Eq, Vec::<&str>::new());

    let err = Serializer::postgresql(&schema)
        .generate_select_query(&query, &Options::new())
        .unwrap_err();

    assert!(err.is_invalid_operator());
}

#[test]
fn connectors_and_groups() {
    let schema = schema();

    assert_eq!(
        where_clause(
            &schema,
            Query::new("User")
                .and("age", Op::Gt, 60)
                .or("name", Op::Eq, "root")
        ),
        r#""users"."age" > 60 OR "users"."name" = 'root'"#
    );

    assert_eq!(
        where_clause(
            &schema,
            Query::new("User").and("age", Op::Gte, 18).and_group(
                Query::new("User")
                    .and("name", Op::Eq, "Bob")
                    .or("name", Op::Eq, "Sue")
            )
        ),
        r#""users"."age" >= 18 AND ("users"."name" = 'Bob' OR "users"."name" = 'Sue')"#
    );

    assert_eq!(
        where_clause(
            &schema,
            Query::new("User")
                .and("age", Op::Gte, 18)
                .not_group(
                    grist_core::stmt::Connector::And,
                    Query::new("User").and("name", Op::Eq, "root")
                )
        ),
        r#""users"."age" >= 18 AND NOT ("users"."name" = 'root')"#
    );
}

#[test]
fn negation_inverts_the_operator() {
    let schema = schema();

    assert_eq!(
        where_clause(&schema, Query::new("User").and_not("age", Op::Gt, 18)),
        r#""users"."age" <= 18"#
    );
    assert_eq!(
        where_clause(
            &schema,
            Query::new("User")
                .and("age", Op::Lt, 10)
                .or_not("name", Op::Like, "B%")
        ),
        r#""users"."age" < 10 OR "users"."name" NOT LIKE 'B%'"#
    );
}

#[test]
fn like_requires_a_string() {
    let schema = schema();

    assert_eq!(
        where_clause(&schema, Query::new("User").and("name", Op::Like, "B%")),
        r#""users"."name" LIKE 'B%'"#
    );

    let err = Serializer::postgresql(&schema)
        .generate_select_query(&Query::new("User").and("name", Op::Like, 1), &Options::new())
        .unwrap_err();
    assert!(err.is_invalid_operator());

    let err = Serializer::postgresql(&schema)
        .generate_select_query(
            &Query::new("User").and("name", Op::Like, FieldRef::new("Role", "name")),
            &Options::new(),
        )
        .unwrap_err();
    assert!(err.is_invalid_operator());
}

#[test]
fn like_against_a_field_literal_is_rejected() {
    let schema = schema();
    let serializer = Serializer::postgresql(&schema);

    let err = serializer
        .generate_select_query(
            &Query::new("User").and("name", Op::Like, Literal::field(FieldRef::new("User", "id"))),
            &Options::new(),
        )
        .unwrap_err();
    assert!(err.is_invalid_operator());
    assert_eq!(
        err.to_string(),
        "invalid operator LIKE on User:name: cannot compare two columns (`User:id`)"
    );

    let err = serializer
        .generate_select_query(
            &Query::new("User").and("name", Op::NotLike, Literal::count_all()),
            &Options::new(),
        )
        .unwrap_err();
    assert!(err.is_invalid_operator());

    assert_eq!(
        where_clause(
            &schema,
            Query::new("User").and("name", Op::Like, Literal::raw("'B' || '%'"))
        ),
        r#""users"."name" LIKE 'B' || '%'"#
    );
}

#[test]
fn column_comparison() {
    let schema = schema();

    assert_eq!(
        where_clause(
            &schema,
            Query::new("User").and("id", Op::Neq, FieldRef::new("User", "age"))
        ),
        r#""users"."id" != "users"."age""#
    );
}

#[test]
fn repeated_condition_is_rendered_once() {
    let schema = schema();

    assert_eq!(
        where_clause(
            &schema,
            Query::new("User")
                .and("age", Op::Gte, 18)
                .and("age", Op::Gte, 18)
        ),
        r#""users"."age" >= 18"#
    );
}

#[test]
fn exists_renders_a_constant_sub_select() {
    let schema = schema();
    let roles = Query::new("Role")
        .and("userID", Op::Eq, FieldRef::new("User", "id"))
        .target("userID");

    assert_eq!(
        where_clause(&schema, Query::new("User").and("id", Op::Exists, roles.clone())),
        r#"EXISTS(SELECT 1 FROM "roles" WHERE "roles"."user_id" = "users"."id" LIMIT 1 OFFSET 0)"#
    );
    assert_eq!(
        where_clause(&schema, Query::new("User").and_not("id", Op::Exists, roles)),
        r#"NOT EXISTS(SELECT 1 FROM "roles" WHERE "roles"."user_id" = "users"."id" LIMIT 1 OFFSET 0)"#
    );
}

#[test]
fn unknown_field_is_a_statement_error() {
    let schema = schema();

    let err = Serializer::postgresql(&schema)
        .generate_select_query(&Query::new("User").and("email", Op::Eq, "a"), &Options::new())
        .unwrap_err();
    assert!(err.is_invalid_statement());

    let err = Serializer::postgresql(&schema)
        .generate_select_query(&Query::new("Account"), &Options::new())
        .unwrap_err();
    assert!(err.is_invalid_statement());
}

#[test]
fn values_are_escaped_per_dialect() {
    let schema = schema();
    let query = Query::new("User")
        .project([FieldRef::new("User", "id")])
        .and("name", Op::Eq, "O'Brien");
    let opts = Options::new().without_projection_aliases();

    assert_eq!(
        Serializer::mysql(&schema)
            .generate_select_query(&query, &opts)
            .unwrap()
            .sql,
        r#"SELECT `users`.`id` FROM `users` WHERE `users`.`name` = 'O''Brien'"#
    );
    assert_eq!(
        Serializer::sqlite(&schema)
            .generate_select_query(&query, &opts)
            .unwrap()
            .sql,
        r#"SELECT "users"."id" FROM "users" WHERE "users"."name" = 'O''Brien'"#
    );
}
