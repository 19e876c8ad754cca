use grist_core::schema::FieldRef;
use grist_core::stmt::{Direction, Op, OrderEntry, OrderExpr};
use pretty_assertions::assert_eq;

#[test]
fn op_names_round_trip() {
    for op in [
        Op::Eq,
        Op::Neq,
        Op::Gt,
        Op::Gte,
        Op::Lt,
        Op::Lte,
        Op::Like,
        Op::NotLike,
        Op::Exists,
        Op::NotExists,
    ] {
        assert_eq!(op.name().parse::<Op>().unwrap(), op);
        assert_eq!(op.invert().invert(), op);
    }
}

#[test]
fn unknown_op_is_an_operator_error() {
    let err = "BETWEEN".parse::<Op>().unwrap_err();

    assert!(err.is_invalid_operator());
    assert_eq!(
        err.to_string(),
        "invalid operator BETWEEN: unknown comparison operator"
    );
}

#[test]
fn parse_order_entries() {
    let entry = OrderEntry::parse("User", "-age").unwrap();
    assert_eq!(entry.direction, Direction::Desc);
    assert_eq!(entry.expr, OrderExpr::Field(FieldRef::new("User", "age")));

    let entry = OrderEntry::parse("User", "Role:name").unwrap();
    assert_eq!(entry.direction, Direction::Asc);
    assert_eq!(entry.expr, OrderExpr::Field(FieldRef::new("Role", "name")));

    let err = OrderEntry::parse("User", "+").unwrap_err();
    assert!(err.is_invalid_statement());
}

#[test]
fn parse_direction() {
    assert_eq!("-".parse::<Direction>().unwrap(), Direction::Desc);
    assert_eq!("ASC".parse::<Direction>().unwrap(), Direction::Asc);
    assert!("sideways".parse::<Direction>().is_err());
}
