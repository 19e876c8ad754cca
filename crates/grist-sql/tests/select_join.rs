use grist_core::{
    schema::{Field, FieldRef, Model, Schema, Type},
    stmt::{Condition, JoinSpec, Op, OrderEntry, Query},
};
use grist_sql::{Options, Serializer};
use pretty_assertions::assert_eq;

fn schema() -> Schema {
    let mut schema = Schema::new();
    schema
        .register(
            Model::new("User")
                .field(Field::new("id", Type::Integer(8)).primary_key())
                .field(Field::new("name", Type::Text).not_null())
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
        .register(
            Model::new("Permission")
                .field(Field::new("id", Type::Integer(8)).primary_key())
                .field(Field::new("roleID", Type::Integer(8)).not_null())
                .field(Field::new("name", Type::Text)),
        )
        .unwrap();
    schema
}

fn select(schema: &Schema, query: &Query) -> String {
    Serializer::postgresql(schema)
        .generate_select_query(query, &Options::new().without_projection_aliases())
        .unwrap()
        .sql
}

#[test]
fn nested_query_without_condition_joins() {
    let schema = schema();
    let query = Query::new("User").and("id", Op::Eq, Query::new("Role").target("userID"));

    assert_eq!(
        select(&schema, &query),
        r#"SELECT "users"."id", "users"."name", "users"."age", "roles"."id", "roles"."user_id", "roles"."name" FROM "users" INNER JOIN "roles" ON "users"."id" = "roles"."user_id""#
    );
}

#[test]
fn nested_query_with_condition_is_a_sub_select() {
    let schema = schema();
    let roles = Query::new("Role")
        .and("name", Op::Eq, "admin")
        .target("userID");
    let query = Query::new("User").and("id", Op::Eq, roles);

    assert_eq!(
        select(&schema, &query),
        r#"SELECT "users"."id", "users"."name", "users"."age" FROM "users" WHERE "users"."id" IN (SELECT "roles"."user_id" FROM "roles" WHERE "roles"."name" = 'admin')"#
    );
}

#[test]
fn sub_select_negation_and_quantifiers() {
    let schema = schema();
    let roles = || {
        Query::new("Role")
            .and("name", Op::Eq, "admin")
            .target("id")
    };

    let query = Query::new("User")
        .project([FieldRef::new("User", "id")])
        .and_not("id", Op::Eq, roles());
    assert_eq!(
        select(&schema, &query),
        r#"SELECT "users"."id" FROM "users" WHERE "users"."id" NOT IN (SELECT "roles"."id" FROM "roles" WHERE "roles"."name" = 'admin')"#
    );

    let query = Query::new("User")
        .project([FieldRef::new("User", "id")])
        .condition(Condition::new(FieldRef::new("User", "age"), Op::Gt, roles()).any());
    assert_eq!(
        select(&schema, &query),
        r#"SELECT "users"."id" FROM "users" WHERE "users"."age" > ANY(SELECT "roles"."id" FROM "roles" WHERE "roles"."name" = 'admin')"#
    );
}

#[test]
fn sub_select_drops_order_and_limit() {
    let schema = schema();
    let roles = Query::new("Role")
        .and("name", Op::Eq, "admin")
        .order_by([OrderEntry::asc(FieldRef::new("Role", "name"))])
        .limit(5)
        .target("userID");
    let query = Query::new("User")
        .project([FieldRef::new("User", "id")])
        .and("id", Op::Eq, roles);

    assert_eq!(
        select(&schema, &query),
        r#"SELECT "users"."id" FROM "users" WHERE "users"."id" IN (SELECT "roles"."user_id" FROM "roles" WHERE "roles"."name" = 'admin')"#
    );
}

#[test]
fn sub_select_without_target_is_an_error() {
    let schema = schema();
    let query = Query::new("User").and("id", Op::Eq, Query::new("Role").and("name", Op::Eq, "admin"));

    let err = Serializer::postgresql(&schema)
        .generate_select_query(&query, &Options::new())
        .unwrap_err();
    assert!(err.is_invalid_statement());
}

#[test]
fn join_sides_are_swapped_when_the_target_is_the_root() {
    let schema = schema();
    let query = Query::new("User")
        .project([FieldRef::new("User", "id")])
        .and(
            FieldRef::new("Role", "userID"),
            Op::Eq,
            Query::new("User").target("id"),
        );

    assert_eq!(
        select(&schema, &query),
        r#"SELECT "users"."id" FROM "users" INNER JOIN "roles" ON "users"."id" = "roles"."user_id""#
    );
}

#[test]
fn join_types() {
    let schema = schema();
    let cases = [
        (JoinSpec::inner(), "INNER JOIN"),
        (JoinSpec::left(), "LEFT JOIN"),
        (JoinSpec::left().outer(), "LEFT OUTER JOIN"),
        (JoinSpec::right(), "RIGHT JOIN"),
        (JoinSpec::right().outer(), "RIGHT OUTER JOIN"),
        (JoinSpec::full(), "FULL JOIN"),
        (JoinSpec::full().outer(), "FULL OUTER JOIN"),
        (JoinSpec::cross(), "CROSS JOIN"),
    ];

    for (spec, keyword) in cases {
        let query = Query::new("User")
            .project([FieldRef::new("User", "id")])
            .join("id", spec, Query::new("Role").target("userID"));

        assert_eq!(
            select(&schema, &query),
            format!(
                r#"SELECT "users"."id" FROM "users" {keyword} "roles" ON "users"."id" = "roles"."user_id""#
            )
        );
    }
}

#[test]
fn full_join_requires_dialect_support() {
    let schema = schema();
    let query = Query::new("User").join("id", JoinSpec::full(), Query::new("Role").target("userID"));

    let err = Serializer::mysql(&schema)
        .generate_select_query(&query, &Options::new())
        .unwrap_err();
    assert!(err.is_unsupported_feature());
}

#[test]
fn edges_on_the_same_model_share_one_join() {
    let schema = schema();
    let query = Query::new("User")
        .project([FieldRef::new("User", "id")])
        .and("id", Op::Eq, Query::new("Role").target("userID"))
        .or("age", Op::Eq, Query::new("Role").target("id"));

    assert_eq!(
        select(&schema, &query),
        r#"SELECT "users"."id" FROM "users" INNER JOIN "roles" ON "users"."id" = "roles"."user_id" OR "users"."age" = "roles"."id""#
    );
}

#[test]
fn joined_models_follow_their_dependencies() {
    let schema = schema();

    // Permission is declared first but joins against Role
    let query = Query::new("User")
        .project([FieldRef::new("User", "id")])
        .and(
            FieldRef::new("Role", "id"),
            Op::Eq,
            Query::new("Permission").target("roleID"),
        )
        .and("id", Op::Eq, Query::new("Role").target("userID"))
        .and(FieldRef::new("Permission", "name"), Op::Eq, "write");

    assert_eq!(
        select(&schema, &query),
        r#"SELECT "users"."id" FROM "users" INNER JOIN "roles" ON "users"."id" = "roles"."user_id" INNER JOIN "permissions" ON "roles"."id" = "permissions"."role_id" WHERE "permissions"."name" = 'write'"#
    );
}

#[test]
fn joins_inside_groups_are_collected() {
    let schema = schema();
    let query = Query::new("User")
        .project([FieldRef::new("User", "id")])
        .and_group(Query::new("User").and("id", Op::Eq, Query::new("Role").target("userID")))
        .and(FieldRef::new("Role", "name"), Op::Eq, "admin");

    assert_eq!(
        select(&schema, &query),
        r#"SELECT "users"."id" FROM "users" INNER JOIN "roles" ON "users"."id" = "roles"."user_id" WHERE "roles"."name" = 'admin'"#
    );
}

#[test]
fn join_cycle_is_a_schema_error() {
    let schema = schema();
    let query = Query::new("User")
        .and(
            FieldRef::new("Role", "id"),
            Op::Eq,
            Query::new("Permission").target("roleID"),
        )
        .and(
            FieldRef::new("Permission", "id"),
            Op::Eq,
            Query::new("Role").target("userID"),
        );

    let err = Serializer::postgresql(&schema)
        .generate_select_query(&query, &Options::new())
        .unwrap_err();
    assert!(err.is_invalid_schema());
}

#[test]
fn order_by_skips_models_outside_the_query() {
    let schema = schema();
    let order = [
        OrderEntry::asc(FieldRef::new("Role", "name")),
        OrderEntry::desc(FieldRef::new("User", "id")),
    ];

    let query = Query::new("User")
        .project([FieldRef::new("User", "id")])
        .order_by(order.clone());
    assert_eq!(
        select(&schema, &query),
        r#"SELECT "users"."id" FROM "users" ORDER BY "users"."id" DESC"#
    );

    let query = Query::new("User")
        .project([FieldRef::new("User", "id")])
        .join("id", JoinSpec::left(), Query::new("Role").target("userID"))
        .order_by(order);
    assert_eq!(
        select(&schema, &query),
        r#"SELECT "users"."id", "roles"."name" FROM "users" LEFT JOIN "roles" ON "users"."id" = "roles"."user_id" ORDER BY "roles"."name" ASC, "users"."id" DESC"#
    );
}

#[test]
fn like_join_edge_is_rejected() {
    let schema = schema();
    let query = Query::new("User").and("name", Op::Like, Query::new("Role").target("name"));

    let err = Serializer::postgresql(&schema)
        .generate_select_query(&query, &Options::new())
        .unwrap_err();
    assert!(err.is_invalid_operator());
    assert_eq!(
        err.to_string(),
        "invalid operator LIKE on User:name: cannot compare two columns (`Role:name`)"
    );
}
