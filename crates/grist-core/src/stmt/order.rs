use super::Literal;
use crate::{schema::FieldRef, Error, Result};

use std::str::FromStr;

/// An `ORDER` record.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderClause {
    pub mode: OrderMode,
    pub entries: Vec<OrderEntry>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OrderMode {
    /// Replaces entries from earlier records
    #[default]
    Replace,

    /// Appends to entries from earlier records
    Append,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderEntry {
    pub expr: OrderExpr,
    pub direction: Direction,
}

/// Something to order or group by.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderExpr {
    Field(FieldRef),
    Literal(Literal),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl OrderEntry {
    pub fn asc(expr: impl Into<OrderExpr>) -> OrderEntry {
        OrderEntry {
            expr: expr.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(expr: impl Into<OrderExpr>) -> OrderEntry {
        OrderEntry {
            expr: expr.into(),
            direction: Direction::Desc,
        }
    }

    /// Parses `"+field"`, `"-field"` or `"field"` against `model`.
    ///
    /// A `Model:field` name overrides the model.
    pub fn parse(model: &str, spec: &str) -> Result<OrderEntry> {
        let (direction, name) = match spec.as_bytes().first() {
            Some(b'+') => (Direction::Asc, &spec[1..]),
            Some(b'-') => (Direction::Desc, &spec[1..]),
            _ => (Direction::Asc, spec),
        };

        if name.is_empty() {
            return Err(Error::invalid_statement(format!(
                "order specification `{spec}` names no field"
            )));
        }

        let field = match name.split_once(':') {
            Some((model, field)) => FieldRef::new(model, field),
            None => FieldRef::new(model, name),
        };

        Ok(OrderEntry {
            expr: OrderExpr::Field(field),
            direction,
        })
    }
}

impl OrderExpr {
    pub fn field_ref(&self) -> Option<&FieldRef> {
        match self {
            OrderExpr::Field(field) => Some(field),
            OrderExpr::Literal(literal) => literal.field_ref(),
        }
    }
}

impl Direction {
    pub fn reverse(self) -> Direction {
        match self {
            Direction::Asc => Direction::Desc,
            Direction::Desc => Direction::Asc,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Direction> {
        match s {
            "+" | "ASC" | "asc" => Ok(Direction::Asc),
            "-" | "DESC" | "desc" => Ok(Direction::Desc),
            _ => Err(Error::invalid_statement(format!(
                "unknown order direction `{s}`"
            ))),
        }
    }
}

impl From<FieldRef> for OrderExpr {
    fn from(value: FieldRef) -> OrderExpr {
        OrderExpr::Field(value)
    }
}

impl From<Literal> for OrderExpr {
    fn from(value: Literal) -> OrderExpr {
        OrderExpr::Literal(value)
    }
}
