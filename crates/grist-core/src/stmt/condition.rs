use super::{Connector, Literal, Op, Quantifier, Query, Value};
use crate::schema::FieldRef;

/// A single comparison in a query representation.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Left-hand side
    pub field: FieldRef,

    pub op: Op,

    /// Right-hand side
    pub value: Operand,

    /// When `true`, the operator is inverted before rendering.
    pub negate: bool,

    /// Joins this condition to the previously rendered one.
    pub connector: Connector,

    /// Set for `<col> <op> ANY(...)` / `ALL(...)` comparisons against a sub-select.
    pub quantifier: Option<Quantifier>,

    /// How to join the target model when this condition is a join edge.
    pub join: Option<JoinSpec>,
}

/// Right-hand side of a condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Value(Value),

    /// Another column
    Field(FieldRef),

    Literal(Literal),

    /// A nested query. Without conditions of its own it describes a join,
    /// otherwise a sub-select.
    Query(Box<Query>),
}

/// A logical grouping record.
///
/// Without a nested query the record only carries a connector and renders
/// nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub connector: Connector,

    /// Renders the group as `NOT (...)`
    pub not: bool,

    pub query: Option<Box<Query>>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JoinSpec {
    pub kind: JoinKind,

    /// Adds `OUTER` to left, right and full joins
    pub outer: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    #[default]
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl Condition {
    pub fn new(field: FieldRef, op: Op, value: impl Into<Operand>) -> Condition {
        Condition {
            field,
            op,
            value: value.into(),
            negate: false,
            connector: Connector::And,
            quantifier: None,
            join: None,
        }
    }

    pub fn negate(mut self) -> Condition {
        self.negate = !self.negate;
        self
    }

    pub fn connector(mut self, connector: Connector) -> Condition {
        self.connector = connector;
        self
    }

    pub fn any(mut self) -> Condition {
        self.quantifier = Some(Quantifier::Any);
        self
    }

    pub fn all(mut self) -> Condition {
        self.quantifier = Some(Quantifier::All);
        self
    }

    pub fn join(mut self, join: JoinSpec) -> Condition {
        self.join = Some(join);
        self
    }

    /// The operator after applying negation.
    pub fn effective_op(&self) -> Op {
        if self.negate {
            self.op.invert()
        } else {
            self.op
        }
    }

    /// A condition is a join edge when its value is a nested query that
    /// carries no condition of its own.
    pub fn is_join_edge(&self) -> bool {
        if self.op.is_exists() {
            return false;
        }

        matches!(&self.value, Operand::Query(query) if !query.has_condition())
    }

    pub fn sub_query(&self) -> Option<&Query> {
        match &self.value {
            Operand::Query(query) => Some(query),
            _ => None,
        }
    }
}

impl JoinSpec {
    pub fn inner() -> JoinSpec {
        JoinSpec::default()
    }

    pub fn left() -> JoinSpec {
        JoinSpec {
            kind: JoinKind::Left,
            outer: false,
        }
    }

    pub fn right() -> JoinSpec {
        JoinSpec {
            kind: JoinKind::Right,
            outer: false,
        }
    }

    pub fn full() -> JoinSpec {
        JoinSpec {
            kind: JoinKind::Full,
            outer: false,
        }
    }

    pub fn cross() -> JoinSpec {
        JoinSpec {
            kind: JoinKind::Cross,
            outer: false,
        }
    }

    pub fn outer(mut self) -> JoinSpec {
        self.outer = true;
        self
    }
}

macro_rules! impl_operand_from_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Operand {
                fn from(value: $ty) -> Operand {
                    Operand::Value(value.into())
                }
            }
        )*
    };
}

impl_operand_from_value!(Value, bool, i32, i64, u32, f64, &str, String);

impl<T: Into<Value>> From<Vec<T>> for Operand {
    fn from(value: Vec<T>) -> Operand {
        Operand::Value(value.into())
    }
}

impl<T: Into<Value>> From<Option<T>> for Operand {
    fn from(value: Option<T>) -> Operand {
        Operand::Value(value.into())
    }
}

impl From<FieldRef> for Operand {
    fn from(value: FieldRef) -> Operand {
        Operand::Field(value)
    }
}

impl From<Literal> for Operand {
    fn from(value: Literal) -> Operand {
        Operand::Literal(value)
    }
}

impl From<Query> for Operand {
    fn from(value: Query) -> Operand {
        Operand::Query(Box::new(value))
    }
}
