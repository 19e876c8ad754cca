use crate::{Error, Result};

use std::{fmt, str::FromStr};

/// A comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    NotLike,
    Exists,
    NotExists,
}

/// Joins a rendered condition to the one before it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connector {
    #[default]
    And,
    Or,
}

/// Compares a column against every (`All`) or some (`Any`) row of a sub-select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantifier {
    Any,
    All,
}

impl Op {
    /// Returns the operator matching the negation of `self`.
    pub fn invert(self) -> Op {
        match self {
            Op::Eq => Op::Neq,
            Op::Neq => Op::Eq,
            Op::Gt => Op::Lte,
            Op::Gte => Op::Lt,
            Op::Lt => Op::Gte,
            Op::Lte => Op::Gt,
            Op::Like => Op::NotLike,
            Op::NotLike => Op::Like,
            Op::Exists => Op::NotExists,
            Op::NotExists => Op::Exists,
        }
    }

    pub fn is_equality(self) -> bool {
        matches!(self, Op::Eq | Op::Neq)
    }

    pub fn is_like(self) -> bool {
        matches!(self, Op::Like | Op::NotLike)
    }

    pub fn is_exists(self) -> bool {
        matches!(self, Op::Exists | Op::NotExists)
    }

    /// Returns the operator name as accepted by [`Op::from_str`].
    pub fn name(self) -> &'static str {
        match self {
            Op::Eq => "EQ",
            Op::Neq => "NEQ",
            Op::Gt => "GT",
            Op::Gte => "GTE",
            Op::Lt => "LT",
            Op::Lte => "LTE",
            Op::Like => "LIKE",
            Op::NotLike => "NOT_LIKE",
            Op::Exists => "EXISTS",
            Op::NotExists => "NOT_EXISTS",
        }
    }
}

impl FromStr for Op {
    type Err = Error;

    fn from_str(s: &str) -> Result<Op> {
        Ok(match s {
            "EQ" => Op::Eq,
            "NEQ" => Op::Neq,
            "GT" => Op::Gt,
            "GTE" => Op::Gte,
            "LT" => Op::Lt,
            "LTE" => Op::Lte,
            "LIKE" => Op::Like,
            "NOT_LIKE" => Op::NotLike,
            "EXISTS" => Op::Exists,
            "NOT_EXISTS" => Op::NotExists,
            _ => {
                return Err(Error::invalid_operator(
                    s,
                    "",
                    "unknown comparison operator",
                ))
            }
        })
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Connector {
    pub fn as_sql(self) -> &'static str {
        match self {
            Connector::And => "AND",
            Connector::Or => "OR",
        }
    }
}

impl Quantifier {
    pub fn as_sql(self) -> &'static str {
        match self {
            Quantifier::Any => "ANY",
            Quantifier::All => "ALL",
        }
    }
}
